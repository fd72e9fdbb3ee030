use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};

use super::dictionary::NameDictionary;
use super::model::{LocalizedName, NameSource};
use super::store::LocalizedNameStore;
use crate::errors::{Error, Result, ValidationError};

#[async_trait]
pub trait LocalizedNameServiceTrait: Send + Sync {
    fn get_localized_name(&self, ticker: &str) -> Result<LocalizedName>;

    /// Copies the dictionary into the store, returning rows written.
    async fn seed_from_dictionary(&self) -> Result<usize>;
}

pub struct LocalizedNameService {
    store: Arc<dyn LocalizedNameStore>,
    dictionary: Arc<NameDictionary>,
}

impl LocalizedNameService {
    pub fn new(store: Arc<dyn LocalizedNameStore>, dictionary: Arc<NameDictionary>) -> Self {
        Self { store, dictionary }
    }
}

#[async_trait]
impl LocalizedNameServiceTrait for LocalizedNameService {
    fn get_localized_name(&self, ticker: &str) -> Result<LocalizedName> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(ValidationError::MissingField("symbol".to_string()).into());
        }

        match self.store.get_name(&ticker) {
            Ok(Some(name)) => {
                return Ok(LocalizedName {
                    ticker,
                    name,
                    source: NameSource::Database,
                })
            }
            Ok(None) => debug!("No stored name for {}, trying dictionary", ticker),
            Err(e) => warn!("Name lookup failed for {}, using dictionary: {}", ticker, e),
        }

        match self.dictionary.get(&ticker) {
            Some(name) => Ok(LocalizedName {
                name: name.to_string(),
                ticker,
                source: NameSource::Dictionary,
            }),
            None => Err(Error::NotFound(format!("No localized name for {}", ticker))),
        }
    }

    async fn seed_from_dictionary(&self) -> Result<usize> {
        if self.dictionary.is_empty() {
            return Ok(0);
        }
        let written = self.store.upsert_names(self.dictionary.entries()).await?;
        info!("Seeded {} localized names", written);
        Ok(written)
    }
}
