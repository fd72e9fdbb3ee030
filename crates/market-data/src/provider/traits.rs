//! Stock data provider trait definition.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::MarketDataError;
use crate::models::{BasicFinancials, CandleSeries, CompanyProfile, NewsArticle, StockQuote};

use super::capabilities::RateLimit;

/// Trait for upstream stock data providers.
///
/// Every method maps to exactly one upstream call, so callers can account
/// for each invocation against a call budget.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use stockcache_market_data::provider::{StockDataProvider, RateLimit};
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl StockDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     // ... implement the fetch methods
/// }
/// ```
#[async_trait]
pub trait StockDataProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and error messages.
    fn id(&self) -> &'static str;

    /// Published call quota of the provider.
    fn rate_limit(&self) -> RateLimit {
        RateLimit::default()
    }

    /// Latest quote. A "no data" sentinel must surface as `SymbolNotFound`.
    async fn get_quote(&self, symbol: &str) -> Result<StockQuote, MarketDataError>;

    /// Company profile. An empty profile must surface as `SymbolNotFound`.
    async fn get_profile(&self, symbol: &str) -> Result<CompanyProfile, MarketDataError>;

    /// OHLCV candles between two Unix timestamps (inclusive).
    ///
    /// An empty range is a valid, empty series.
    async fn get_candles(
        &self,
        symbol: &str,
        resolution: &str,
        from: i64,
        to: i64,
    ) -> Result<CandleSeries, MarketDataError>;

    /// Company news published between two dates (inclusive).
    async fn get_company_news(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NewsArticle>, MarketDataError>;

    /// Key financial metrics (valuation ratios, 52-week range, margins).
    async fn get_basic_financials(&self, symbol: &str)
        -> Result<BasicFinancials, MarketDataError>;
}
