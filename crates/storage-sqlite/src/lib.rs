//! SQLite storage for the stock data gateway.
//!
//! Implements the store traits from `stockcache-core` with Diesel:
//! - connection pool, pragmas and embedded migrations
//! - a single writer task that serializes all writes
//! - repositories for the payload cache, the upstream call log and
//!   localized names
//!
//! This is the only crate that depends on Diesel.

pub mod api_calls;
pub mod db;
pub mod errors;
pub mod names;
pub mod schema;
pub mod stock_cache;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use api_calls::ApiCallRepository;
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};
pub use errors::{IntoCore, StorageError};
pub use names::StockNameRepository;
pub use stock_cache::StockCacheRepository;

pub use stockcache_core::errors::{DatabaseError, Error, Result};
