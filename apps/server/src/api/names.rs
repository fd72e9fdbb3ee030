use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use stockcache_core::names::LocalizedName;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Debug, Deserialize)]
struct NameQuery {
    symbol: Option<String>,
}

async fn get_chinese_name(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NameQuery>,
) -> ApiResult<Json<LocalizedName>> {
    let name = state
        .name_service
        .get_localized_name(query.symbol.as_deref().unwrap_or_default())?;
    Ok(Json(name))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/stock/chinese-name", get(get_chinese_name))
}
