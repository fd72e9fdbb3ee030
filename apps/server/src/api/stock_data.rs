use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use stockcache_core::stock_data::{
    BudgetUsage, DataType, StockData, StockDataParams, StockDataRequest,
};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Debug, Deserialize)]
struct StockDataQuery {
    symbol: Option<String>,
    #[serde(rename = "type")]
    data_type: Option<String>,
    resolution: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

async fn get_stock_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StockDataQuery>,
) -> ApiResult<Json<StockData>> {
    let data_type = match query.data_type.as_deref() {
        Some(raw) if !raw.trim().is_empty() => raw.parse::<DataType>()?,
        _ => DataType::Quote,
    };
    let params = StockDataParams {
        resolution: query.resolution,
        from: query.from,
        to: query.to,
    };
    let request = StockDataRequest::new(
        query.symbol.as_deref().unwrap_or_default(),
        data_type,
        &params,
        Utc::now(),
    )?;

    let data = state.stock_data_service.get_data(request).await?;
    Ok(Json(data))
}

async fn get_usage(State(state): State<Arc<AppState>>) -> ApiResult<Json<BudgetUsage>> {
    Ok(Json(state.stock_data_service.budget_usage()?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cache/stock-data", get(get_stock_data))
        .route("/cache/usage", get(get_usage))
}
