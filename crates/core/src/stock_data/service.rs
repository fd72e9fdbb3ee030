use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::Serialize;
use serde_json::Value;
use stockcache_market_data::{MarketDataError, StockDataProvider};

use super::locks::KeyedLocks;
use super::model::{BudgetUsage, CacheEntry, DataSource, PurgeReport, StockData};
use super::policy::{to_chrono, BudgetWindow, GatewayConfig, Reservation, CALL_LOG_RETENTION};
use super::request::{DataQuery, StockDataRequest};
use super::store::{ApiCallStore, StockCacheStore};
use crate::errors::{Error, Result};

const STALE_CACHE_WARNING: &str = "API rate limit reached, serving cached data";
const FALLBACK_CACHE_WARNING: &str = "Upstream request failed, serving cached data";

/// Cache-and-rate-limit gateway in front of an upstream provider.
#[async_trait]
pub trait StockDataServiceTrait: Send + Sync {
    /// Freshest payload the cache policy and call budget allow.
    async fn get_data(&self, request: StockDataRequest) -> Result<StockData>;

    /// Calls counted in each budget window right now.
    fn budget_usage(&self) -> Result<BudgetUsage>;

    /// Drops cache rows past retention and call records past the day window.
    async fn purge_expired(&self) -> Result<PurgeReport>;
}

pub struct StockDataService {
    provider: Arc<dyn StockDataProvider>,
    cache_store: Arc<dyn StockCacheStore>,
    call_store: Arc<dyn ApiCallStore>,
    config: GatewayConfig,
    locks: KeyedLocks,
}

impl StockDataService {
    pub fn new(
        provider: Arc<dyn StockDataProvider>,
        cache_store: Arc<dyn StockCacheStore>,
        call_store: Arc<dyn ApiCallStore>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            provider,
            cache_store,
            call_store,
            config,
            locks: KeyedLocks::default(),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub(crate) async fn get_data_at(
        &self,
        request: StockDataRequest,
        now: DateTime<Utc>,
    ) -> Result<StockData> {
        let cache_key = request.cache_key();

        let cached = self.read_cache(&cache_key);
        if let Some(entry) = cached.as_ref().filter(|e| self.config.policy.is_fresh(e, now)) {
            debug!("Cache hit for {}", cache_key);
            return Ok(StockData::from_entry(entry, DataSource::Cache, None));
        }

        let _guard = self.locks.lock(&cache_key).await;

        // A concurrent request may have refreshed the row while we waited
        let cached = self.read_cache(&cache_key).or(cached);
        if let Some(entry) = cached.as_ref().filter(|e| self.config.policy.is_fresh(e, now)) {
            debug!("Cache refreshed by concurrent request for {}", cache_key);
            return Ok(StockData::from_entry(entry, DataSource::Cache, None));
        }

        let call_id = match self
            .call_store
            .try_reserve_call(now, &self.config.budget)
            .await
        {
            Ok(Reservation::Granted(id)) => Some(id),
            Ok(Reservation::Denied(window)) => {
                return self.budget_exhausted(&cache_key, cached, window);
            }
            Err(e) => {
                warn!(
                    "Call budget check failed for {}, allowing upstream call: {}",
                    cache_key, e
                );
                None
            }
        };

        match self.fetch_upstream(&request).await {
            Ok(payload) => {
                let entry = CacheEntry {
                    cache_key,
                    symbol: request.symbol.clone(),
                    data_type: request.data_type(),
                    payload,
                    updated_at: now,
                };
                if let Err(e) = self.cache_store.upsert_entry(entry.clone()).await {
                    error!("Failed to cache {}: {}", entry.cache_key, e);
                }
                info!("Fetched {} from {}", entry.cache_key, self.provider.id());
                Ok(StockData::from_entry(&entry, DataSource::Api, None))
            }
            Err(err) => {
                if let Some(id) = call_id {
                    if let Err(e) = self.call_store.release_call(id).await {
                        warn!("Failed to release call record {}: {}", id, e);
                    }
                }
                match cached {
                    Some(entry) => {
                        warn!(
                            "Upstream fetch failed for {}, serving cached data: {}",
                            cache_key, err
                        );
                        Ok(StockData::from_entry(
                            &entry,
                            DataSource::FallbackCache,
                            Some(FALLBACK_CACHE_WARNING.to_string()),
                        ))
                    }
                    None => {
                        warn!("Upstream fetch failed for {}: {}", cache_key, err);
                        Err(Error::Upstream(err))
                    }
                }
            }
        }
    }

    /// Storage read failures degrade to a cache miss.
    fn read_cache(&self, cache_key: &str) -> Option<CacheEntry> {
        match self.cache_store.get_entry(cache_key) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cache read failed for {}, treating as miss: {}", cache_key, e);
                None
            }
        }
    }

    fn budget_exhausted(
        &self,
        cache_key: &str,
        cached: Option<CacheEntry>,
        window: BudgetWindow,
    ) -> Result<StockData> {
        match cached {
            Some(entry) => {
                warn!("Call budget exhausted ({:?}), serving stale {}", window, cache_key);
                Ok(StockData::from_entry(
                    &entry,
                    DataSource::StaleCache,
                    Some(STALE_CACHE_WARNING.to_string()),
                ))
            }
            None => {
                warn!("Call budget exhausted ({:?}) and no cache for {}", window, cache_key);
                Err(Error::RateLimitExceeded {
                    retry_after_secs: window.retry_after_secs(),
                })
            }
        }
    }

    async fn fetch_upstream(
        &self,
        request: &StockDataRequest,
    ) -> std::result::Result<Value, MarketDataError> {
        let symbol = request.symbol.as_str();
        let provider = self.provider.as_ref();

        let fetch = async {
            match &request.query {
                DataQuery::Quote => to_payload(provider.get_quote(symbol).await?),
                DataQuery::Profile => to_payload(provider.get_profile(symbol).await?),
                DataQuery::Metrics => to_payload(provider.get_basic_financials(symbol).await?),
                DataQuery::Candles {
                    resolution,
                    from,
                    to,
                } => to_payload(
                    provider
                        .get_candles(symbol, resolution, from.value(), to.value())
                        .await?,
                ),
                DataQuery::News { from, to } => to_payload(
                    provider
                        .get_company_news(symbol, from.value(), to.value())
                        .await?,
                ),
            }
        };

        tokio::time::timeout(self.config.upstream_timeout, fetch)
            .await
            .map_err(|_| MarketDataError::Timeout {
                provider: provider.id().to_string(),
            })?
    }

    pub(crate) fn budget_usage_at(&self, now: DateTime<Utc>) -> Result<BudgetUsage> {
        Ok(BudgetUsage {
            calls_last_minute: self
                .call_store
                .count_calls_since(BudgetWindow::Minute.cutoff(now))?,
            calls_last_day: self
                .call_store
                .count_calls_since(BudgetWindow::Day.cutoff(now))?,
            max_calls_per_minute: self.config.budget.max_calls_per_minute,
            max_calls_per_day: self.config.budget.max_calls_per_day,
        })
    }

    pub(crate) async fn purge_expired_at(&self, now: DateTime<Utc>) -> Result<PurgeReport> {
        let cache_entries = self
            .cache_store
            .purge_older_than(now - to_chrono(self.config.cache_retention))
            .await?;
        let api_calls = self
            .call_store
            .purge_calls_before(now - to_chrono(CALL_LOG_RETENTION))
            .await?;

        if cache_entries > 0 || api_calls > 0 {
            info!(
                "Purged {} cache entries and {} call records",
                cache_entries, api_calls
            );
        }
        Ok(PurgeReport {
            cache_entries,
            api_calls,
        })
    }
}

fn to_payload<T: Serialize>(value: T) -> std::result::Result<Value, MarketDataError> {
    serde_json::to_value(value).map_err(|e| MarketDataError::ProviderError {
        provider: "gateway".to_string(),
        message: format!("Failed to encode payload: {}", e),
    })
}

#[async_trait]
impl StockDataServiceTrait for StockDataService {
    async fn get_data(&self, request: StockDataRequest) -> Result<StockData> {
        self.get_data_at(request, Utc::now()).await
    }

    fn budget_usage(&self) -> Result<BudgetUsage> {
        self.budget_usage_at(Utc::now())
    }

    async fn purge_expired(&self) -> Result<PurgeReport> {
        self.purge_expired_at(Utc::now()).await
    }
}
