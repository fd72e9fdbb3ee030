//! Google Translate public web endpoint (`client=gtx`, no key).

use async_trait::async_trait;
use serde_json::Value;

use super::Translator;
use crate::errors::TranslationError;

pub const PROVIDER_ID: &str = "google";
const BASE_URL: &str = "https://translate.googleapis.com/translate_a/single";

pub struct GoogleTranslator {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for GoogleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

/// The response is a nested array; `[0]` holds `[translated, original, ...]`
/// segments, one per sentence.
fn parse_response(body: &Value) -> Result<String, TranslationError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslationError::invalid(PROVIDER_ID, "missing segment list"))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() {
        return Err(TranslationError::invalid(PROVIDER_ID, "empty translation"));
    }
    Ok(text)
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn translate(
        &self,
        text: &str,
        source_lang: Option<&str>,
        target_lang: &str,
    ) -> Result<String, TranslationError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("client", "gtx"),
                ("sl", source_lang.unwrap_or("auto")),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| TranslationError::request(PROVIDER_ID, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::request(
                PROVIDER_ID,
                format!("HTTP {}", status),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TranslationError::invalid(PROVIDER_ID, e.to_string()))?;
        parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_joins_segments() {
        let body = json!([
            [
                ["苹果发布新款手机。", "Apple releases a new phone.", null, null, 10],
                ["股价上涨。", "Shares rose.", null, null, 10]
            ],
            null,
            "en"
        ]);
        assert_eq!(parse_response(&body).unwrap(), "苹果发布新款手机。股价上涨。");
    }

    #[test]
    fn test_parse_rejects_unexpected_shape() {
        assert!(parse_response(&json!({"error": "bad"})).is_err());
        assert!(parse_response(&json!([[]])).is_err());
    }
}
