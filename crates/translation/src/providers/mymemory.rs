//! MyMemory public API. Free tier, needs an explicit source language.

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use super::Translator;
use crate::errors::TranslationError;

pub const PROVIDER_ID: &str = "mymemory";
const BASE_URL: &str = "https://api.mymemory.translated.net/get";
const DEFAULT_SOURCE_LANG: &str = "en";
const QUOTA_WARNING: &str = "MYMEMORY WARNING";

pub struct MyMemoryTranslator {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    response_data: Option<MyMemoryData>,
    /// Sent as a number on success and sometimes as a string on errors.
    response_status: serde_json::Value,
    #[serde(default)]
    response_details: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryData {
    translated_text: String,
}

impl MyMemoryTranslator {
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

impl Default for MyMemoryTranslator {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_response(body: MyMemoryResponse) -> Result<String, TranslationError> {
    let status = match &body.response_status {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    };
    if status != Some(200) {
        return Err(TranslationError::invalid(
            PROVIDER_ID,
            format!(
                "status {}: {}",
                body.response_status,
                body.response_details.unwrap_or_default()
            ),
        ));
    }

    let text = body
        .response_data
        .map(|d| d.translated_text)
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(TranslationError::invalid(PROVIDER_ID, "empty translation"));
    }
    // Quota exhaustion comes back as a 200 with the warning as the "translation"
    if text.to_ascii_uppercase().contains(QUOTA_WARNING) {
        return Err(TranslationError::invalid(PROVIDER_ID, "daily quota exhausted"));
    }
    Ok(text)
}

#[async_trait]
impl Translator for MyMemoryTranslator {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn translate(
        &self,
        text: &str,
        source_lang: Option<&str>,
        target_lang: &str,
    ) -> Result<String, TranslationError> {
        let source = match source_lang {
            Some(lang) if !lang.eq_ignore_ascii_case("auto") => lang,
            _ => DEFAULT_SOURCE_LANG,
        };
        let langpair = format!("{}|{}", source, target_lang);
        debug!("MyMemory request langpair={}", langpair);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", text), ("langpair", langpair.as_str())])
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

        let body: MyMemoryResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::invalid(PROVIDER_ID, e.to_string()))?;
        parse_response(body)
    }
}
