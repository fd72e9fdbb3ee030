//! Database model for cache rows.

use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;

use stockcache_core::stock_data::{CacheEntry, DataType};

use crate::errors::StorageError;

#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::stock_cache)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StockCacheDB {
    pub cache_key: String,
    pub symbol: String,
    pub data_type: String,
    /// JSON-encoded payload
    pub data: String,
    pub updated_at: NaiveDateTime,
}

impl From<&CacheEntry> for StockCacheDB {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            cache_key: entry.cache_key.clone(),
            symbol: entry.symbol.clone(),
            data_type: entry.data_type.as_str().to_string(),
            data: entry.payload.to_string(),
            updated_at: entry.updated_at.naive_utc(),
        }
    }
}

impl TryFrom<StockCacheDB> for CacheEntry {
    type Error = StorageError;

    fn try_from(row: StockCacheDB) -> Result<Self, Self::Error> {
        let data_type = row.data_type.parse::<DataType>().map_err(|_| {
            StorageError::SerializationError(format!(
                "Unknown data type '{}' for {}",
                row.data_type, row.cache_key
            ))
        })?;
        let payload = serde_json::from_str(&row.data).map_err(|e| {
            StorageError::SerializationError(format!("Corrupt payload for {}: {}", row.cache_key, e))
        })?;

        Ok(CacheEntry {
            cache_key: row.cache_key,
            symbol: row.symbol,
            data_type,
            payload,
            updated_at: Utc.from_utc_datetime(&row.updated_at),
        })
    }
}
