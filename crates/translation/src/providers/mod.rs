use async_trait::async_trait;

use crate::errors::TranslationError;

pub mod google;
pub mod mymemory;

pub use google::GoogleTranslator;
pub use mymemory::MyMemoryTranslator;

/// One translation backend.
#[async_trait]
pub trait Translator: Send + Sync {
    fn id(&self) -> &'static str;

    /// `source_lang` of `None` lets the provider detect the language where it can.
    async fn translate(
        &self,
        text: &str,
        source_lang: Option<&str>,
        target_lang: &str,
    ) -> Result<String, TranslationError>;
}
