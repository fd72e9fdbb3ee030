use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest quote for a symbol
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockQuote {
    /// Current (last traded) price
    pub current_price: Decimal,

    /// Absolute change against the previous close
    pub change: Option<Decimal>,

    /// Percent change against the previous close
    pub change_percent: Option<Decimal>,

    /// High price of the day
    pub high: Option<Decimal>,

    /// Low price of the day
    pub low: Option<Decimal>,

    /// Open price of the day
    pub open: Option<Decimal>,

    /// Previous close price
    pub previous_close: Option<Decimal>,

    /// Time of the quote, serialized as Unix seconds
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
}
