//! Stockcache Core - Domain types, services, and storage traits.
//!
//! This crate contains the gateway logic: cache freshness, the rolling call
//! budget, stale fallbacks and localized names. It is storage-agnostic and
//! defines traits that are implemented by the `storage-sqlite` crate.

pub mod errors;
pub mod names;
pub mod stock_data;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
