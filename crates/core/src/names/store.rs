use async_trait::async_trait;

use crate::errors::Result;

/// Persistent ticker → localized name table.
#[async_trait]
pub trait LocalizedNameStore: Send + Sync {
    fn get_name(&self, ticker: &str) -> Result<Option<String>>;

    /// Inserts or replaces names, returning the number of rows written.
    async fn upsert_names(&self, names: Vec<(String, String)>) -> Result<usize>;
}
