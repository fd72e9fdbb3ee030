use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use stockcache_core::names::{
    LocalizedNameService, LocalizedNameServiceTrait, NameDictionary,
};
use stockcache_core::stock_data::{
    CallBudget, GatewayConfig, StockDataService, StockDataServiceTrait,
};
use stockcache_market_data::{FinnhubProvider, StockDataProvider};
use stockcache_storage_sqlite::{
    db, ApiCallRepository, StockCacheRepository, StockNameRepository,
};
use stockcache_translation::{translator_by_id, TranslationChain, Translator};

pub struct AppState {
    pub stock_data_service: Arc<dyn StockDataServiceTrait>,
    pub name_service: Arc<dyn LocalizedNameServiceTrait>,
    pub translator: Arc<TranslationChain>,
}

pub fn init_tracing() {
    let log_format = std::env::var("SC_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

fn build_provider(config: &Config) -> Arc<dyn StockDataProvider> {
    let api_key = config.finnhub_api_key.clone();
    match &config.finnhub_base_url {
        Some(base_url) => Arc::new(FinnhubProvider::with_base_url(api_key, base_url.clone())),
        None => Arc::new(FinnhubProvider::new(api_key)),
    }
}

fn build_translation_chain(config: &Config) -> TranslationChain {
    let strategies: Vec<Box<dyn Translator>> = config
        .translation_providers
        .iter()
        .filter_map(|id| {
            let translator = translator_by_id(id);
            if translator.is_none() {
                warn!("Ignoring unknown translation provider '{}'", id);
            }
            translator
        })
        .collect();
    TranslationChain::new(strategies, config.translation_timeout)
}

fn load_dictionary(path: &str) -> NameDictionary {
    match NameDictionary::from_path(path) {
        Ok(dictionary) => dictionary,
        Err(e) => {
            warn!("Localized name dictionary unavailable: {}", e);
            NameDictionary::default()
        }
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer(pool.as_ref().clone());

    let provider = build_provider(config);
    let quota = provider.rate_limit();
    let gateway_config = GatewayConfig {
        policy: config.cache_policy.clone(),
        budget: CallBudget {
            max_calls_per_minute: config
                .max_calls_per_minute
                .unwrap_or(quota.requests_per_minute),
            max_calls_per_day: config.max_calls_per_day.unwrap_or(quota.requests_per_day),
        },
        upstream_timeout: config.upstream_timeout,
        cache_retention: config.cache_retention,
    };
    info!(
        "Call budget: {}/min, {}/day via {}",
        gateway_config.budget.max_calls_per_minute,
        gateway_config.budget.max_calls_per_day,
        provider.id()
    );

    let cache_repository = Arc::new(StockCacheRepository::new(pool.clone(), writer.clone()));
    let call_repository = Arc::new(ApiCallRepository::new(pool.clone(), writer.clone()));
    let stock_data_service = Arc::new(StockDataService::new(
        provider,
        cache_repository,
        call_repository,
        gateway_config,
    ));

    let name_repository = Arc::new(StockNameRepository::new(pool.clone(), writer.clone()));
    let dictionary = Arc::new(load_dictionary(&config.names_file));
    let name_service = Arc::new(LocalizedNameService::new(name_repository, dictionary));
    if config.seed_names {
        name_service.seed_from_dictionary().await?;
    }

    let translator = Arc::new(build_translation_chain(config));
    info!("Translation providers: {:?}", translator.provider_ids());

    Ok(Arc::new(AppState {
        stock_data_service,
        name_service,
        translator,
    }))
}
