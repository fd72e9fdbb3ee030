use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::model::StockCacheDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::stock_cache::dsl as stock_cache_dsl;
use stockcache_core::stock_data::{CacheEntry, StockCacheStore};
use stockcache_core::Result;

pub struct StockCacheRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl StockCacheRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl StockCacheStore for StockCacheRepository {
    fn get_entry(&self, cache_key: &str) -> Result<Option<CacheEntry>> {
        let mut conn = get_connection(&self.pool)?;

        let row = stock_cache_dsl::stock_cache
            .find(cache_key)
            .select(StockCacheDB::as_select())
            .first::<StockCacheDB>(&mut conn)
            .optional()
            .into_core()?;

        row.map(CacheEntry::try_from)
            .transpose()
            .map_err(StorageError::into)
    }

    async fn upsert_entry(&self, entry: CacheEntry) -> Result<()> {
        let row = StockCacheDB::from(&entry);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::replace_into(stock_cache_dsl::stock_cache)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::QueryFailed)?;
                Ok(())
            })
            .await
    }

    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let cutoff = cutoff.naive_utc();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(
                    stock_cache_dsl::stock_cache.filter(stock_cache_dsl::updated_at.lt(cutoff)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_db;
    use chrono::{Duration, TimeZone};
    use serde_json::json;
    use stockcache_core::stock_data::DataType;

    fn entry(key: &str, updated_at: DateTime<Utc>, price: f64) -> CacheEntry {
        CacheEntry {
            cache_key: key.to_string(),
            symbol: "AAPL".to_string(),
            data_type: DataType::Quote,
            payload: json!({"currentPrice": price}),
            updated_at,
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_and_get_roundtrip() {
        let (_dir, pool, writer) = setup_db();
        let repo = StockCacheRepository::new(pool, writer);

        assert!(repo.get_entry("AAPL:quote").unwrap().is_none());

        repo.upsert_entry(entry("AAPL:quote", t0(), 189.5)).await.unwrap();
        let stored = repo.get_entry("AAPL:quote").unwrap().unwrap();
        assert_eq!(stored.payload, json!({"currentPrice": 189.5}));
        assert_eq!(stored.updated_at, t0());
        assert_eq!(stored.data_type, DataType::Quote);
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_row() {
        let (_dir, pool, writer) = setup_db();
        let repo = StockCacheRepository::new(pool, writer);

        repo.upsert_entry(entry("AAPL:quote", t0(), 1.0)).await.unwrap();
        let later = t0() + Duration::seconds(90);
        repo.upsert_entry(entry("AAPL:quote", later, 2.0)).await.unwrap();

        let stored = repo.get_entry("AAPL:quote").unwrap().unwrap();
        assert_eq!(stored.payload, json!({"currentPrice": 2.0}));
        assert_eq!(stored.updated_at, later);
    }

    #[tokio::test]
    async fn test_purge_older_than() {
        let (_dir, pool, writer) = setup_db();
        let repo = StockCacheRepository::new(pool, writer);

        repo.upsert_entry(entry("OLD:quote", t0() - Duration::days(8), 1.0))
            .await
            .unwrap();
        repo.upsert_entry(entry("NEW:quote", t0() - Duration::days(1), 1.0))
            .await
            .unwrap();

        let removed = repo.purge_older_than(t0() - Duration::days(7)).await.unwrap();
        assert_eq!(removed, 1);
        assert!(repo.get_entry("OLD:quote").unwrap().is_none());
        assert!(repo.get_entry("NEW:quote").unwrap().is_some());
    }
}
