use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use stockcache_translation::DEFAULT_TARGET_LANG;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Debug, Deserialize)]
struct TranslateRequest {
    #[serde(default)]
    text: String,
    #[serde(default, alias = "targetLang")]
    target_lang: Option<String>,
    #[serde(default, alias = "sourceLang")]
    source_lang: Option<String>,
}

#[derive(Debug, Serialize)]
struct TranslateResponse {
    translated_text: String,
    provider: String,
    translated: bool,
}

async fn translate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TranslateRequest>,
) -> ApiResult<Json<TranslateResponse>> {
    let target = body
        .target_lang
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(DEFAULT_TARGET_LANG);

    let result = state
        .translator
        .translate(&body.text, body.source_lang.as_deref(), target)
        .await?;

    Ok(Json(TranslateResponse {
        translated_text: result.text,
        provider: result.provider,
        translated: result.translated,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/translate", post(translate))
}
