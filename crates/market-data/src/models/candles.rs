use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// OHLCV series in ascending time order.
///
/// All vectors have the same length; an empty series means the provider
/// had no trading data for the range.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandleSeries {
    /// Bar open times (Unix seconds)
    pub timestamps: Vec<i64>,
    pub open: Vec<Decimal>,
    pub high: Vec<Decimal>,
    pub low: Vec<Decimal>,
    pub close: Vec<Decimal>,
    pub volume: Vec<Decimal>,
}

impl CandleSeries {
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }
}
