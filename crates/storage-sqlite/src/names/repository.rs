use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::model::StockNameDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::stock_names::dsl as stock_names_dsl;
use crate::utils::chunk_rows_for_sqlite;
use stockcache_core::names::LocalizedNameStore;
use stockcache_core::Result;

const STOCK_NAME_COLUMNS: usize = 3;

pub struct StockNameRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl StockNameRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl LocalizedNameStore for StockNameRepository {
    fn get_name(&self, ticker: &str) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;

        stock_names_dsl::stock_names
            .find(ticker)
            .select(stock_names_dsl::name_zh)
            .first::<String>(&mut conn)
            .optional()
            .into_core()
    }

    async fn upsert_names(&self, names: Vec<(String, String)>) -> Result<usize> {
        if names.is_empty() {
            return Ok(0);
        }

        let updated_at = Utc::now().naive_utc();
        let rows: Vec<StockNameDB> = names
            .into_iter()
            .map(|(ticker, name_zh)| StockNameDB {
                ticker,
                name_zh,
                updated_at,
            })
            .collect();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut written = 0;
                for chunk in chunk_rows_for_sqlite(&rows, STOCK_NAME_COLUMNS) {
                    written += diesel::replace_into(stock_names_dsl::stock_names)
                        .values(chunk)
                        .execute(conn)
                        .into_core()?;
                }
                Ok(written)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_db;

    fn pair(ticker: &str, name: &str) -> (String, String) {
        (ticker.to_string(), name.to_string())
    }

    #[tokio::test]
    async fn test_get_name_missing() {
        let (_dir, pool, writer) = setup_db();
        let repo = StockNameRepository::new(pool, writer);
        assert_eq!(repo.get_name("AAPL").unwrap(), None);
    }

    #[tokio::test]
    async fn test_upsert_and_replace() {
        let (_dir, pool, writer) = setup_db();
        let repo = StockNameRepository::new(pool, writer);

        let written = repo
            .upsert_names(vec![pair("AAPL", "苹果"), pair("MSFT", "微软")])
            .await
            .unwrap();
        assert_eq!(written, 2);
        assert_eq!(repo.get_name("AAPL").unwrap().as_deref(), Some("苹果"));

        repo.upsert_names(vec![pair("AAPL", "苹果公司")]).await.unwrap();
        assert_eq!(repo.get_name("AAPL").unwrap().as_deref(), Some("苹果公司"));
        assert_eq!(repo.get_name("MSFT").unwrap().as_deref(), Some("微软"));
    }

    #[tokio::test]
    async fn test_upsert_spans_multiple_chunks() {
        let (_dir, pool, writer) = setup_db();
        let repo = StockNameRepository::new(pool, writer);

        let names: Vec<_> = (0..700)
            .map(|i| (format!("T{:04}", i), format!("名称{}", i)))
            .collect();
        assert_eq!(repo.upsert_names(names).await.unwrap(), 700);
        assert_eq!(repo.get_name("T0699").unwrap().as_deref(), Some("名称699"));
    }

    #[tokio::test]
    async fn test_upsert_empty_is_noop() {
        let (_dir, pool, writer) = setup_db();
        let repo = StockNameRepository::new(pool, writer);
        assert_eq!(repo.upsert_names(Vec::new()).await.unwrap(), 0);
    }
}
