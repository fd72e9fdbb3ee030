//! Stock data provider abstractions and implementations.
//!
//! The gateway in `stockcache-core` only sees the [`StockDataProvider`] trait;
//! concrete providers live in submodules.

mod capabilities;
mod traits;

pub mod finnhub;

pub use capabilities::RateLimit;
pub use traits::StockDataProvider;
