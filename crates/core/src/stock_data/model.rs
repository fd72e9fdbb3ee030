//! Domain models for the stock data gateway.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Error, Result};

/// Kind of payload a caller asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Quote,
    Profile,
    Candles,
    News,
    Metrics,
}

impl DataType {
    pub const ALL: [DataType; 5] = [
        DataType::Quote,
        DataType::Profile,
        DataType::Candles,
        DataType::News,
        DataType::Metrics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Quote => "quote",
            DataType::Profile => "profile",
            DataType::Candles => "candles",
            DataType::News => "news",
            DataType::Metrics => "metrics",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        DataType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| Error::UnsupportedType(s.to_string()))
    }
}

/// Where a response payload came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Fresh cache row, no upstream call.
    Cache,
    /// Fetched from upstream on this request.
    Api,
    /// Call budget exhausted; expired cache row served.
    StaleCache,
    /// Upstream failed; expired cache row served.
    FallbackCache,
}

/// One cached payload, keyed by its cache key.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheEntry {
    pub cache_key: String,
    pub symbol: String,
    pub data_type: DataType,
    pub payload: Value,
    pub updated_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Age of the entry at `now`.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.updated_at
    }
}

/// Gateway response.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StockData {
    pub data: Value,
    pub cached: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stale: bool,
    /// When the payload was fetched from upstream.
    pub timestamp: DateTime<Utc>,
    pub source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Valid but empty candles/news result.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub empty: bool,
}

impl StockData {
    pub(crate) fn from_entry(entry: &CacheEntry, source: DataSource, warning: Option<String>) -> Self {
        Self {
            data: entry.payload.clone(),
            cached: source != DataSource::Api,
            stale: matches!(source, DataSource::StaleCache | DataSource::FallbackCache),
            timestamp: entry.updated_at,
            source,
            warning,
            empty: is_empty_payload(entry.data_type, &entry.payload),
        }
    }
}

fn is_empty_payload(data_type: DataType, payload: &Value) -> bool {
    match data_type {
        DataType::Candles => payload
            .get("timestamps")
            .and_then(Value::as_array)
            .map_or(true, Vec::is_empty),
        DataType::News => payload.as_array().map_or(true, Vec::is_empty),
        _ => false,
    }
}

/// Current call-budget consumption.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUsage {
    pub calls_last_minute: i64,
    pub calls_last_day: i64,
    pub max_calls_per_minute: u32,
    pub max_calls_per_day: u32,
}

/// Rows removed by a retention sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub cache_entries: usize,
    pub api_calls: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(data_type: DataType, payload: Value) -> CacheEntry {
        CacheEntry {
            cache_key: "AAPL:x".to_string(),
            symbol: "AAPL".to_string(),
            data_type,
            payload,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_data_type_parse_is_case_insensitive() {
        assert_eq!("Quote".parse::<DataType>().unwrap(), DataType::Quote);
        assert_eq!(" candles ".parse::<DataType>().unwrap(), DataType::Candles);
        assert!(matches!(
            "dividends".parse::<DataType>(),
            Err(Error::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_source_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(DataSource::FallbackCache).unwrap(),
            json!("fallback_cache")
        );
    }

    #[test]
    fn test_response_flags_per_source() {
        let e = entry(DataType::Quote, json!({"currentPrice": 1.0}));
        let api = StockData::from_entry(&e, DataSource::Api, None);
        assert!(!api.cached && !api.stale);

        let stale = StockData::from_entry(&e, DataSource::StaleCache, Some("w".into()));
        assert!(stale.cached && stale.stale);

        let body = serde_json::to_value(&api).unwrap();
        assert!(body.get("stale").is_none());
        assert!(body.get("warning").is_none());
        assert!(body.get("empty").is_none());
    }

    #[test]
    fn test_empty_collections_flagged() {
        let candles = entry(DataType::Candles, json!({"timestamps": [], "close": []}));
        assert!(StockData::from_entry(&candles, DataSource::Api, None).empty);

        let news = entry(DataType::News, json!([{"headline": "x"}]));
        assert!(!StockData::from_entry(&news, DataSource::Api, None).empty);
    }
}
