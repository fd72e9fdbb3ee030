//! Storage traits for the gateway.
//!
//! Reads are synchronous (pooled connection), writes are async because the
//! SQLite implementation serializes them through a single writer task.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::CacheEntry;
use super::policy::{CallBudget, Reservation};
use crate::errors::Result;

/// Cache rows, at most one per cache key.
#[async_trait]
pub trait StockCacheStore: Send + Sync {
    fn get_entry(&self, cache_key: &str) -> Result<Option<CacheEntry>>;

    /// Inserts or replaces the row for `entry.cache_key` (last writer wins).
    async fn upsert_entry(&self, entry: CacheEntry) -> Result<()>;

    /// Deletes rows with `updated_at < cutoff`, returning how many.
    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize>;
}

/// Append-only log of upstream calls used for quota accounting.
#[async_trait]
pub trait ApiCallStore: Send + Sync {
    /// Number of records with `created_at > cutoff`.
    fn count_calls_since(&self, cutoff: DateTime<Utc>) -> Result<i64>;

    /// Counts both budget windows and appends a record at `now` if both
    /// have room, as one atomic step.
    async fn try_reserve_call(&self, now: DateTime<Utc>, budget: &CallBudget)
        -> Result<Reservation>;

    /// Removes a record granted by `try_reserve_call` whose call failed.
    async fn release_call(&self, call_id: i64) -> Result<()>;

    /// Deletes records with `created_at < cutoff`, returning how many.
    async fn purge_calls_before(&self, cutoff: DateTime<Utc>) -> Result<usize>;
}
