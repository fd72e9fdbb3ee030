//! Finnhub stock data provider implementation.
//!
//! Endpoints used:
//! - `/quote` for the latest quote
//! - `/stock/profile2` for company profiles
//! - `/stock/candle` for OHLCV series
//! - `/company-news` for news
//! - `/stock/metric` for basic financials
//!
//! Finnhub free tier is limited to 60 API calls per minute.
//! API documentation: https://finnhub.io/docs/api

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::{BasicFinancials, CandleSeries, CompanyProfile, NewsArticle, StockQuote};
use crate::provider::{RateLimit, StockDataProvider};

const BASE_URL: &str = "https://finnhub.io/api/v1";
const PROVIDER_ID: &str = "FINNHUB";

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /quote endpoint
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    /// Current price
    c: Option<f64>,
    /// Change
    d: Option<f64>,
    /// Percent change
    dp: Option<f64>,
    /// High price of the day
    h: Option<f64>,
    /// Low price of the day
    l: Option<f64>,
    /// Open price of the day
    o: Option<f64>,
    /// Previous close
    pc: Option<f64>,
    /// Timestamp (Unix)
    t: Option<i64>,
}

/// Response from /stock/candle endpoint
#[derive(Debug, Deserialize)]
struct CandleResponse {
    /// Status: "ok" or "no_data"
    s: String,
    #[serde(default)]
    c: Vec<f64>,
    #[serde(default)]
    h: Vec<f64>,
    #[serde(default)]
    l: Vec<f64>,
    #[serde(default)]
    o: Vec<f64>,
    #[serde(default)]
    v: Vec<f64>,
    #[serde(default)]
    t: Vec<i64>,
}

/// Response from /stock/profile2 endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    name: Option<String>,
    ticker: Option<String>,
    exchange: Option<String>,
    finnhub_industry: Option<String>,
    country: Option<String>,
    currency: Option<String>,
    /// Market capitalization (in millions)
    market_capitalization: Option<f64>,
    share_outstanding: Option<f64>,
    ipo: Option<String>,
    weburl: Option<String>,
    logo: Option<String>,
    phone: Option<String>,
}

/// Item from /company-news endpoint
#[derive(Debug, Deserialize)]
struct NewsItem {
    #[serde(default)]
    headline: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    datetime: i64,
    image: Option<String>,
    category: Option<String>,
    related: Option<String>,
}

/// Response from /stock/metric endpoint
#[derive(Debug, Deserialize)]
struct MetricResponse {
    #[serde(default)]
    metric: Option<Map<String, Value>>,
}

/// Error response from Finnhub
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

// ============================================================================
// FinnhubProvider
// ============================================================================

/// Finnhub stock data provider.
pub struct FinnhubProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FinnhubProvider {
    /// Create a new Finnhub provider with the given API key.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL.to_string())
    }

    /// Create a provider pointed at a different API root (proxies, test doubles).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Make a GET request to the Finnhub API.
    async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<String, MarketDataError> {
        let url = format!("{}{}", self.base_url, endpoint);

        debug!("Finnhub request: {} with {} params", endpoint, params.len());

        let response = self
            .client
            .get(&url)
            .header("X-Finnhub-Token", &self.api_key)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout {
                        provider: PROVIDER_ID.to_string(),
                    }
                } else {
                    MarketDataError::provider(PROVIDER_ID, format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();

        // 403 is what Finnhub returns once the plan quota is spent
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::FORBIDDEN
        {
            warn!("Finnhub rate limited request to {}", endpoint);
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(MarketDataError::provider(
                PROVIDER_ID,
                "Invalid or missing API key",
            ));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(status.as_u16(), &body));
        }

        response.text().await.map_err(|e| {
            MarketDataError::provider(PROVIDER_ID, format!("Failed to read response: {}", e))
        })
    }
}

fn error_from_body(status: u16, body: &str) -> MarketDataError {
    if let Ok(ErrorResponse { error: Some(msg) }) = serde_json::from_str::<ErrorResponse>(body) {
        return MarketDataError::provider(PROVIDER_ID, msg);
    }
    MarketDataError::provider(PROVIDER_ID, format!("HTTP {} - {}", status, body))
}

fn decode<T: for<'de> Deserialize<'de>>(body: &str, what: &str) -> Result<T, MarketDataError> {
    serde_json::from_str(body).map_err(|e| {
        MarketDataError::provider(PROVIDER_ID, format!("Failed to parse {} response: {}", what, e))
    })
}

fn to_decimal(value: f64, field: &str) -> Result<Decimal, MarketDataError> {
    Decimal::try_from(value)
        .map_err(|_| MarketDataError::provider(PROVIDER_ID, format!("Invalid {}: {}", field, value)))
}

fn to_decimals(values: &[f64], field: &str) -> Result<Vec<Decimal>, MarketDataError> {
    values.iter().map(|v| to_decimal(*v, field)).collect()
}

fn parse_quote(symbol: &str, body: &str) -> Result<StockQuote, MarketDataError> {
    let response: QuoteResponse = decode(body, "quote")?;

    let current = response.c.ok_or_else(|| {
        MarketDataError::SymbolNotFound(format!("No quote data for symbol: {}", symbol))
    })?;

    // Finnhub returns zeros for unknown symbols instead of an error
    if current == 0.0 && response.o.unwrap_or(0.0) == 0.0 {
        return Err(MarketDataError::SymbolNotFound(format!(
            "Symbol not found or no trading data: {}",
            symbol
        )));
    }

    let timestamp = response
        .t
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
        .unwrap_or_else(Utc::now);

    Ok(StockQuote {
        current_price: to_decimal(current, "current price")?,
        change: response.d.and_then(|v| Decimal::try_from(v).ok()),
        change_percent: response.dp.and_then(|v| Decimal::try_from(v).ok()),
        high: response.h.and_then(|v| Decimal::try_from(v).ok()),
        low: response.l.and_then(|v| Decimal::try_from(v).ok()),
        open: response.o.and_then(|v| Decimal::try_from(v).ok()),
        previous_close: response.pc.and_then(|v| Decimal::try_from(v).ok()),
        timestamp,
    })
}

fn parse_profile(symbol: &str, body: &str) -> Result<CompanyProfile, MarketDataError> {
    let response: ProfileResponse = decode(body, "profile")?;

    // An unknown symbol yields `{}`
    if response.name.is_none() && response.ticker.is_none() {
        return Err(MarketDataError::SymbolNotFound(format!(
            "No profile for symbol: {}",
            symbol
        )));
    }

    Ok(CompanyProfile {
        name: response.name,
        ticker: response.ticker,
        exchange: response.exchange,
        industry: response.finnhub_industry,
        country: response.country,
        currency: response.currency,
        market_cap: response.market_capitalization,
        share_outstanding: response.share_outstanding,
        ipo: response.ipo,
        weburl: response.weburl,
        logo: response.logo,
        phone: response.phone,
    })
}

fn parse_candles(symbol: &str, body: &str) -> Result<CandleSeries, MarketDataError> {
    let response: CandleResponse = decode(body, "candle")?;

    if response.s == "no_data" {
        debug!("Finnhub has no candles for {} in the requested range", symbol);
        return Ok(CandleSeries::default());
    }
    if response.s != "ok" {
        return Err(MarketDataError::provider(
            PROVIDER_ID,
            format!("Unexpected candle status '{}' for {}", response.s, symbol),
        ));
    }

    let len = response.t.len();
    let lengths = [
        response.o.len(),
        response.h.len(),
        response.l.len(),
        response.c.len(),
        response.v.len(),
    ];
    if lengths.iter().any(|l| *l != len) {
        return Err(MarketDataError::provider(
            PROVIDER_ID,
            format!("Candle arrays for {} have mismatched lengths", symbol),
        ));
    }

    Ok(CandleSeries {
        timestamps: response.t,
        open: to_decimals(&response.o, "open")?,
        high: to_decimals(&response.h, "high")?,
        low: to_decimals(&response.l, "low")?,
        close: to_decimals(&response.c, "close")?,
        volume: to_decimals(&response.v, "volume")?,
    })
}

fn parse_news(body: &str) -> Result<Vec<NewsArticle>, MarketDataError> {
    let items: Vec<NewsItem> = decode(body, "news")?;

    Ok(items
        .into_iter()
        .map(|item| NewsArticle {
            headline: item.headline,
            summary: item.summary,
            url: item.url,
            source: item.source,
            datetime: item.datetime,
            image: item.image.filter(|s| !s.is_empty()),
            category: item.category,
            related: item.related,
        })
        .filter(|article| !article.is_excluded_source())
        .collect())
}

fn parse_metrics(symbol: &str, body: &str) -> Result<BasicFinancials, MarketDataError> {
    let response: MetricResponse = decode(body, "metric")?;

    match response.metric {
        Some(metric) if !metric.is_empty() => Ok(BasicFinancials {
            symbol: symbol.to_string(),
            metric,
        }),
        _ => Err(MarketDataError::SymbolNotFound(format!(
            "No financial metrics for symbol: {}",
            symbol
        ))),
    }
}

#[async_trait]
impl StockDataProvider for FinnhubProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: 60,
            requests_per_day: 1000,
        }
    }

    async fn get_quote(&self, symbol: &str) -> Result<StockQuote, MarketDataError> {
        let body = self.fetch("/quote", &[("symbol", symbol)]).await?;
        parse_quote(symbol, &body)
    }

    async fn get_profile(&self, symbol: &str) -> Result<CompanyProfile, MarketDataError> {
        let body = self.fetch("/stock/profile2", &[("symbol", symbol)]).await?;
        parse_profile(symbol, &body)
    }

    async fn get_candles(
        &self,
        symbol: &str,
        resolution: &str,
        from: i64,
        to: i64,
    ) -> Result<CandleSeries, MarketDataError> {
        if from > to {
            return Err(MarketDataError::InvalidRequest(format!(
                "Candle range start {} is after end {}",
                from, to
            )));
        }
        let from = from.to_string();
        let to = to.to_string();
        let params = [
            ("symbol", symbol),
            ("resolution", resolution),
            ("from", from.as_str()),
            ("to", to.as_str()),
        ];
        let body = self.fetch("/stock/candle", &params).await?;
        parse_candles(symbol, &body)
    }

    async fn get_company_news(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NewsArticle>, MarketDataError> {
        let from = from.format("%Y-%m-%d").to_string();
        let to = to.format("%Y-%m-%d").to_string();
        let params = [
            ("symbol", symbol),
            ("from", from.as_str()),
            ("to", to.as_str()),
        ];
        let body = self.fetch("/company-news", &params).await?;
        parse_news(&body)
    }

    async fn get_basic_financials(
        &self,
        symbol: &str,
    ) -> Result<BasicFinancials, MarketDataError> {
        let body = self
            .fetch("/stock/metric", &[("symbol", symbol), ("metric", "all")])
            .await?;
        parse_metrics(symbol, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_provider_id() {
        let provider = FinnhubProvider::new("test_key".to_string());
        assert_eq!(provider.id(), "FINNHUB");
    }

    #[test]
    fn test_rate_limit() {
        let provider = FinnhubProvider::new("test_key".to_string());
        let limit = provider.rate_limit();
        assert_eq!(limit.requests_per_minute, 60);
        assert_eq!(limit.requests_per_day, 1000);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let provider =
            FinnhubProvider::with_base_url("k".to_string(), "http://localhost:9000/".to_string());
        assert_eq!(provider.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_parse_quote() {
        let body = r#"{"c":189.5,"d":1.25,"dp":0.664,"h":190.1,"l":187.2,"o":188.0,"pc":188.25,"t":1700000000}"#;
        let quote = parse_quote("AAPL", body).unwrap();
        assert_eq!(quote.current_price, dec!(189.5));
        assert_eq!(quote.previous_close, Some(dec!(188.25)));
        assert_eq!(quote.timestamp.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_parse_quote_zero_sentinel_is_not_found() {
        let body = r#"{"c":0,"d":null,"dp":null,"h":0,"l":0,"o":0,"pc":0,"t":0}"#;
        let err = parse_quote("NOPE", body).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_parse_profile_empty_is_not_found() {
        let err = parse_profile("NOPE", "{}").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_parse_profile_keeps_market_cap_unit() {
        let body = r#"{"name":"Apple Inc","ticker":"AAPL","exchange":"NASDAQ","finnhubIndustry":"Technology","country":"US","currency":"USD","marketCapitalization":2950000.5}"#;
        let profile = parse_profile("AAPL", body).unwrap();
        assert_eq!(profile.industry.as_deref(), Some("Technology"));
        assert_eq!(profile.market_cap, Some(2950000.5));
    }

    #[test]
    fn test_parse_candles_no_data_is_empty_series() {
        let series = parse_candles("AAPL", r#"{"s":"no_data"}"#).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_parse_candles() {
        let body = r#"{"s":"ok","t":[1,2],"o":[1.0,2.0],"h":[1.5,2.5],"l":[0.5,1.5],"c":[1.2,2.2],"v":[100,200]}"#;
        let series = parse_candles("AAPL", body).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.close, vec![dec!(1.2), dec!(2.2)]);
    }

    #[test]
    fn test_parse_candles_mismatched_lengths() {
        let body = r#"{"s":"ok","t":[1,2],"o":[1.0],"h":[1.5,2.5],"l":[0.5,1.5],"c":[1.2,2.2],"v":[100,200]}"#;
        assert!(matches!(
            parse_candles("AAPL", body),
            Err(MarketDataError::ProviderError { .. })
        ));
    }

    #[test]
    fn test_parse_news_filters_excluded_sources() {
        let body = r#"[
            {"headline":"A","summary":"","url":"https://reuters.com/a","source":"Reuters","datetime":1},
            {"headline":"B","summary":"","url":"https://seekingalpha.com/b","source":"SeekingAlpha","datetime":2}
        ]"#;
        let news = parse_news(body).unwrap();
        assert_eq!(news.len(), 1);
        assert_eq!(news[0].headline, "A");
    }

    #[test]
    fn test_parse_metrics_empty_is_not_found() {
        let err = parse_metrics("NOPE", r#"{"metric":{},"series":{}}"#).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_error_from_body_uses_error_field() {
        let err = error_from_body(422, r#"{"error":"Wrong resolution"}"#);
        assert_eq!(err.to_string(), "Provider error: FINNHUB - Wrong resolution");
    }

    #[tokio::test]
    async fn test_inverted_candle_range_rejected_without_request() {
        let provider = FinnhubProvider::new("test_key".to_string());
        let err = provider.get_candles("AAPL", "D", 10, 5).await.unwrap_err();
        assert!(matches!(err, MarketDataError::InvalidRequest(_)));
    }
}
