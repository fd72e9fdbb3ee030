//! Request parsing and cache key construction.

use std::fmt::Display;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Deserialize;

use super::model::DataType;
use crate::errors::{Result, ValidationError};

/// Candle resolutions accepted upstream (minutes, day, week, month).
pub const CANDLE_RESOLUTIONS: &[&str] = &["1", "5", "15", "30", "60", "D", "W", "M"];

pub const DEFAULT_CANDLE_RESOLUTION: &str = "D";
pub const DEFAULT_CANDLE_LOOKBACK_DAYS: i64 = 30;
pub const DEFAULT_NEWS_LOOKBACK_DAYS: i64 = 7;

const KEY_SEPARATOR: &str = ":";
const DEFAULT_KEY_PART: &str = "default";

/// Raw optional parameters as received from a caller.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct StockDataParams {
    pub resolution: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// A range bound that remembers whether the caller supplied it.
///
/// Defaulted bounds depend on the clock, so they are keyed as `default`
/// rather than by value; otherwise every request would miss the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeBound<T> {
    Given(T),
    Default(T),
}

impl<T: Copy + Display> RangeBound<T> {
    pub fn value(&self) -> T {
        match self {
            RangeBound::Given(v) | RangeBound::Default(v) => *v,
        }
    }

    fn key_part(&self) -> String {
        match self {
            RangeBound::Given(v) => v.to_string(),
            RangeBound::Default(_) => DEFAULT_KEY_PART.to_string(),
        }
    }
}

/// What to fetch, with every parameter that changes the payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataQuery {
    Quote,
    Profile,
    Metrics,
    Candles {
        resolution: String,
        from: RangeBound<i64>,
        to: RangeBound<i64>,
    },
    News {
        from: RangeBound<NaiveDate>,
        to: RangeBound<NaiveDate>,
    },
}

/// A validated gateway request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StockDataRequest {
    pub symbol: String,
    pub query: DataQuery,
}

impl StockDataRequest {
    /// Validates caller input and resolves defaulted ranges against `now`.
    pub fn new(
        symbol: &str,
        data_type: DataType,
        params: &StockDataParams,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(ValidationError::MissingField("symbol".to_string()).into());
        }

        let query = match data_type {
            DataType::Quote => DataQuery::Quote,
            DataType::Profile => DataQuery::Profile,
            DataType::Metrics => DataQuery::Metrics,
            DataType::Candles => parse_candles(params, now)?,
            DataType::News => parse_news(params, now)?,
        };

        Ok(Self { symbol, query })
    }

    pub fn data_type(&self) -> DataType {
        match self.query {
            DataQuery::Quote => DataType::Quote,
            DataQuery::Profile => DataType::Profile,
            DataQuery::Metrics => DataType::Metrics,
            DataQuery::Candles { .. } => DataType::Candles,
            DataQuery::News { .. } => DataType::News,
        }
    }

    /// Deterministic, injective key over symbol, type and range parameters.
    ///
    /// Components are percent-encoded so the separator never occurs inside one.
    pub fn cache_key(&self) -> String {
        let mut parts = vec![self.symbol.clone(), self.data_type().as_str().to_string()];
        match &self.query {
            DataQuery::Candles {
                resolution,
                from,
                to,
            } => {
                parts.push(resolution.clone());
                parts.push(from.key_part());
                parts.push(to.key_part());
            }
            DataQuery::News { from, to } => {
                parts.push(from.key_part());
                parts.push(to.key_part());
            }
            DataQuery::Quote | DataQuery::Profile | DataQuery::Metrics => {}
        }

        parts
            .iter()
            .map(|p| urlencoding::encode(p).into_owned())
            .collect::<Vec<_>>()
            .join(KEY_SEPARATOR)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_timestamp(field: &str, raw: &str) -> Result<i64> {
    raw.parse::<i64>().map_err(|_| {
        ValidationError::InvalidInput(format!("'{}' must be a Unix timestamp, got '{}'", field, raw))
            .into()
    })
}

fn parse_candles(params: &StockDataParams, now: DateTime<Utc>) -> Result<DataQuery> {
    let resolution = match non_empty(&params.resolution) {
        Some(raw) => {
            let normalized = raw.to_uppercase();
            if !CANDLE_RESOLUTIONS.contains(&normalized.as_str()) {
                return Err(ValidationError::InvalidInput(format!(
                    "Unsupported resolution '{}', expected one of {}",
                    raw,
                    CANDLE_RESOLUTIONS.join(", ")
                ))
                .into());
            }
            normalized
        }
        None => DEFAULT_CANDLE_RESOLUTION.to_string(),
    };

    let to = match non_empty(&params.to) {
        Some(raw) => RangeBound::Given(parse_timestamp("to", raw)?),
        None => RangeBound::Default(now.timestamp()),
    };
    let from = match non_empty(&params.from) {
        Some(raw) => RangeBound::Given(parse_timestamp("from", raw)?),
        None => RangeBound::Default(
            to.value() - Duration::days(DEFAULT_CANDLE_LOOKBACK_DAYS).num_seconds(),
        ),
    };

    if from.value() > to.value() {
        return Err(ValidationError::InvalidInput(format!(
            "'from' ({}) must not be after 'to' ({})",
            from.value(),
            to.value()
        ))
        .into());
    }

    Ok(DataQuery::Candles {
        resolution,
        from,
        to,
    })
}

fn parse_news(params: &StockDataParams, now: DateTime<Utc>) -> Result<DataQuery> {
    let to = match non_empty(&params.to) {
        Some(raw) => RangeBound::Given(NaiveDate::parse_from_str(raw, "%Y-%m-%d")?),
        None => RangeBound::Default(now.date_naive()),
    };
    let from = match non_empty(&params.from) {
        Some(raw) => RangeBound::Given(NaiveDate::parse_from_str(raw, "%Y-%m-%d")?),
        None => RangeBound::Default(to.value() - Duration::days(DEFAULT_NEWS_LOOKBACK_DAYS)),
    };

    if from.value() > to.value() {
        return Err(ValidationError::InvalidInput(format!(
            "'from' ({}) must not be after 'to' ({})",
            from.value(),
            to.value()
        ))
        .into());
    }

    Ok(DataQuery::News { from, to })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn params(resolution: Option<&str>, from: Option<&str>, to: Option<&str>) -> StockDataParams {
        StockDataParams {
            resolution: resolution.map(String::from),
            from: from.map(String::from),
            to: to.map(String::from),
        }
    }

    #[test]
    fn test_symbol_is_trimmed_and_uppercased() {
        let req =
            StockDataRequest::new(" aapl ", DataType::Quote, &StockDataParams::default(), now())
                .unwrap();
        assert_eq!(req.symbol, "AAPL");
        assert_eq!(req.cache_key(), "AAPL:quote");
    }

    #[test]
    fn test_empty_symbol_rejected() {
        let err = StockDataRequest::new("  ", DataType::Quote, &StockDataParams::default(), now())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingField(_))
        ));
    }

    #[test]
    fn test_candle_resolutions_never_share_a_key() {
        let daily = StockDataRequest::new(
            "AAPL",
            DataType::Candles,
            &params(Some("D"), Some("1700000000"), Some("1700600000")),
            now(),
        )
        .unwrap();
        let weekly = StockDataRequest::new(
            "AAPL",
            DataType::Candles,
            &params(Some("W"), Some("1700000000"), Some("1700600000")),
            now(),
        )
        .unwrap();
        assert_eq!(daily.cache_key(), "AAPL:candles:D:1700000000:1700600000");
        assert_ne!(daily.cache_key(), weekly.cache_key());
    }

    #[test]
    fn test_candle_defaults_are_keyed_stably() {
        let a = StockDataRequest::new("AAPL", DataType::Candles, &params(None, None, None), now())
            .unwrap();
        let later = now() + Duration::seconds(30);
        let b = StockDataRequest::new("AAPL", DataType::Candles, &params(None, None, None), later)
            .unwrap();
        assert_eq!(a.cache_key(), "AAPL:candles:D:default:default");
        assert_eq!(a.cache_key(), b.cache_key());

        match a.query {
            DataQuery::Candles { from, to, .. } => {
                assert_eq!(to.value(), now().timestamp());
                assert_eq!(to.value() - from.value(), 30 * 86_400);
            }
            other => panic!("unexpected query {:?}", other),
        }
    }

    #[test]
    fn test_candle_resolution_validated_and_normalized() {
        let req = StockDataRequest::new(
            "AAPL",
            DataType::Candles,
            &params(Some("w"), None, None),
            now(),
        )
        .unwrap();
        assert!(req.cache_key().starts_with("AAPL:candles:W:"));

        assert!(StockDataRequest::new(
            "AAPL",
            DataType::Candles,
            &params(Some("2H"), None, None),
            now()
        )
        .is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(StockDataRequest::new(
            "AAPL",
            DataType::Candles,
            &params(None, Some("200"), Some("100")),
            now()
        )
        .is_err());
        assert!(StockDataRequest::new(
            "AAPL",
            DataType::News,
            &params(None, Some("2024-03-10"), Some("2024-03-01")),
            now()
        )
        .is_err());
    }

    #[test]
    fn test_news_key_includes_dates() {
        let req = StockDataRequest::new(
            "AAPL",
            DataType::News,
            &params(None, Some("2024-03-01"), Some("2024-03-08")),
            now(),
        )
        .unwrap();
        assert_eq!(req.cache_key(), "AAPL:news:2024-03-01:2024-03-08");

        let defaulted =
            StockDataRequest::new("AAPL", DataType::News, &params(None, None, None), now()).unwrap();
        match defaulted.query {
            DataQuery::News { from, to } => {
                assert_eq!(to.value(), NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
                assert_eq!(from.value(), NaiveDate::from_ymd_opt(2024, 3, 8).unwrap());
            }
            other => panic!("unexpected query {:?}", other),
        }
    }

    #[test]
    fn test_separator_in_symbol_cannot_forge_a_key() {
        let forged = StockDataRequest::new(
            "AAPL:candles",
            DataType::Quote,
            &StockDataParams::default(),
            now(),
        )
        .unwrap();
        assert_eq!(forged.cache_key(), "AAPL%3ACANDLES:quote");
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let err = StockDataRequest::new(
            "AAPL",
            DataType::Candles,
            &params(None, Some("yesterday"), None),
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::InvalidInput(_))));
    }
}
