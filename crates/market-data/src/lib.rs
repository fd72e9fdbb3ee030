//! Stockcache Market Data Crate
//!
//! Upstream stock data providers behind a single async contract.
//!
//! # Overview
//!
//! - [`StockDataProvider`] - one method per data type, one upstream call per method
//! - [`FinnhubProvider`] - Finnhub implementation
//! - Typed payloads: [`StockQuote`], [`CompanyProfile`], [`CandleSeries`],
//!   [`NewsArticle`], [`BasicFinancials`]
//!
//! Providers translate vendor sentinels ("all zero" quotes, empty profiles)
//! into [`MarketDataError::SymbolNotFound`] so callers never cache them.

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{BasicFinancials, CandleSeries, CompanyProfile, NewsArticle, StockQuote};
pub use provider::finnhub::FinnhubProvider;
pub use provider::{RateLimit, StockDataProvider};
