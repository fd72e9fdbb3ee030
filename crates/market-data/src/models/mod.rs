//! Stock data models
//!
//! Provider-agnostic payload types returned by [`StockDataProvider`](crate::provider::StockDataProvider):
//! - `quote` - Latest trade snapshot (StockQuote)
//! - `profile` - Company profile (CompanyProfile)
//! - `candles` - OHLCV series (CandleSeries)
//! - `news` - Company news (NewsArticle)
//! - `financials` - Key metrics (BasicFinancials)

mod candles;
mod financials;
mod news;
mod profile;
mod quote;

pub use candles::CandleSeries;
pub use financials::BasicFinancials;
pub use news::NewsArticle;
pub use profile::CompanyProfile;
pub use quote::StockQuote;
