use std::time::Duration;

use log::{debug, warn};
use serde::Serialize;

use crate::errors::TranslationError;
use crate::providers::Translator;

pub const DEFAULT_TARGET_LANG: &str = "zh-CN";
pub const MAX_TEXT_CHARS: usize = 5000;
const PASS_THROUGH: &str = "none";

/// Result of a translation attempt. `translated` is false when every
/// provider failed and `text` is the input unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Translation {
    pub text: String,
    pub provider: String,
    pub translated: bool,
}

pub struct TranslationChain {
    strategies: Vec<Box<dyn Translator>>,
    attempt_timeout: Duration,
}

impl TranslationChain {
    pub fn new(strategies: Vec<Box<dyn Translator>>, attempt_timeout: Duration) -> Self {
        Self {
            strategies,
            attempt_timeout,
        }
    }

    pub fn provider_ids(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.id()).collect()
    }

    pub async fn translate(
        &self,
        text: &str,
        source_lang: Option<&str>,
        target_lang: &str,
    ) -> Result<Translation, TranslationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(TranslationError::EmptyText);
        }
        let len = trimmed.chars().count();
        if len > MAX_TEXT_CHARS {
            return Err(TranslationError::TextTooLong {
                len,
                max: MAX_TEXT_CHARS,
            });
        }

        for strategy in &self.strategies {
            let attempt = strategy.translate(trimmed, source_lang, target_lang);
            let outcome = match tokio::time::timeout(self.attempt_timeout, attempt).await {
                Ok(result) => result,
                Err(_) => Err(TranslationError::Timeout {
                    provider: strategy.id().to_string(),
                }),
            };

            match outcome {
                Ok(translated) => {
                    debug!("Translated {} chars via {}", len, strategy.id());
                    return Ok(Translation {
                        text: translated,
                        provider: strategy.id().to_string(),
                        translated: true,
                    });
                }
                Err(e) => warn!("Translation via {} failed: {}", strategy.id(), e),
            }
        }

        Ok(Translation {
            text: trimmed.to_string(),
            provider: PASS_THROUGH.to_string(),
            translated: false,
        })
    }
}
