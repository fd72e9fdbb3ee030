//! Text translation through an ordered list of public providers.
//!
//! Each [`Translator`] is tried in turn with its own timeout; when every
//! provider fails the input text is returned unchanged.

mod chain;
mod errors;
pub mod providers;

pub use chain::{Translation, TranslationChain, DEFAULT_TARGET_LANG, MAX_TEXT_CHARS};
pub use errors::TranslationError;
pub use providers::{GoogleTranslator, MyMemoryTranslator, Translator};

/// Builds a translator from its configuration id (`google`, `mymemory`).
pub fn translator_by_id(id: &str) -> Option<Box<dyn Translator>> {
    match id.trim().to_ascii_lowercase().as_str() {
        providers::google::PROVIDER_ID => Some(Box::new(GoogleTranslator::new())),
        providers::mymemory::PROVIDER_ID => Some(Box::new(MyMemoryTranslator::new())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translator_by_id() {
        assert_eq!(translator_by_id("google").map(|t| t.id()), Some("google"));
        assert_eq!(translator_by_id(" MyMemory ").map(|t| t.id()), Some("mymemory"));
        assert!(translator_by_id("deepl").is_none());
    }
}
