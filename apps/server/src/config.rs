use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use stockcache_core::stock_data::CachePolicy;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub finnhub_api_key: String,
    /// Overrides the Finnhub API root (proxies, local mocks).
    pub finnhub_base_url: Option<String>,
    /// Unset limits fall back to the provider's published quota.
    pub max_calls_per_minute: Option<u32>,
    pub max_calls_per_day: Option<u32>,
    pub upstream_timeout: Duration,
    pub cache_policy: CachePolicy,
    pub cache_retention: Duration,
    pub sweep_interval: Duration,
    pub names_file: String,
    pub seed_names: bool,
    pub translation_providers: Vec<String>,
    pub translation_timeout: Duration,
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid {}: {}", key, raw)),
        _ => Ok(None),
    }
}

fn secs_var(key: &str, default: Duration) -> Result<Duration> {
    Ok(parse_var::<u64>(key)?.map(Duration::from_secs).unwrap_or(default))
}

fn millis_var(key: &str, default_ms: u64) -> Result<Duration> {
    Ok(Duration::from_millis(
        parse_var::<u64>(key)?.unwrap_or(default_ms),
    ))
}

fn list_var(key: &str, default: &str) -> Vec<String> {
    var_or(key, default)
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = var_or("SC_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid SC_LISTEN_ADDR")?;
        let finnhub_api_key = std::env::var("FINNHUB_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .context("FINNHUB_API_KEY must be set")?;

        let defaults = CachePolicy::default();
        let cache_policy = CachePolicy {
            quote: secs_var("SC_TTL_QUOTE_SECS", defaults.quote)?,
            profile: secs_var("SC_TTL_PROFILE_SECS", defaults.profile)?,
            candles: secs_var("SC_TTL_CANDLES_SECS", defaults.candles)?,
            news: secs_var("SC_TTL_NEWS_SECS", defaults.news)?,
            metrics: secs_var("SC_TTL_METRICS_SECS", defaults.metrics)?,
        };
        let retention_days = parse_var::<u64>("SC_CACHE_RETENTION_DAYS")?.unwrap_or(7);

        Ok(Self {
            listen_addr,
            db_path: var_or("SC_DB_PATH", "./db/app.db"),
            cors_allow: list_var("SC_CORS_ALLOW_ORIGINS", "*"),
            request_timeout: millis_var("SC_REQUEST_TIMEOUT_MS", 30_000)?,
            finnhub_api_key,
            finnhub_base_url: std::env::var("FINNHUB_BASE_URL")
                .ok()
                .filter(|u| !u.trim().is_empty()),
            max_calls_per_minute: parse_var("SC_MAX_CALLS_PER_MINUTE")?,
            max_calls_per_day: parse_var("SC_MAX_CALLS_PER_DAY")?,
            upstream_timeout: millis_var("SC_UPSTREAM_TIMEOUT_MS", 10_000)?,
            cache_policy,
            cache_retention: Duration::from_secs(retention_days * 24 * 60 * 60),
            sweep_interval: secs_var("SC_SWEEP_INTERVAL_SECS", Duration::from_secs(3600))?,
            names_file: var_or("SC_NAMES_FILE", "data/chinese_names.json"),
            seed_names: parse_var::<bool>("SC_SEED_NAMES")?.unwrap_or(false),
            translation_providers: list_var("SC_TRANSLATION_PROVIDERS", "google,mymemory"),
            translation_timeout: millis_var("SC_TRANSLATION_TIMEOUT_MS", 5_000)?,
        })
    }
}
