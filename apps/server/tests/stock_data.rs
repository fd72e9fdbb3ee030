use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    response::Response,
    Router,
};
use serde_json::Value;
use stockcache_server::{api::app_router, build_state, config::Config};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

/// Router over a fresh database. The Finnhub root points at a closed local
/// port so any upstream call fails fast, and translation runs without
/// providers so nothing leaves the machine.
async fn build_test_router(customize: impl FnOnce(&mut Config)) -> (TempDir, Router) {
    let tmp = tempdir().unwrap();
    std::env::set_var("FINNHUB_API_KEY", "test-key");

    let mut config = Config::from_env().unwrap();
    config.db_path = tmp.path().join("test.db").to_string_lossy().into_owned();
    config.finnhub_base_url = Some("http://127.0.0.1:9".to_string());
    config.names_file = concat!(env!("CARGO_MANIFEST_DIR"), "/data/chinese_names.json").to_string();
    config.translation_providers = Vec::new();
    customize(&mut config);

    let state = build_state(&config).await.unwrap();
    (tmp, app_router(state, &config).unwrap())
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn stock_data_requires_symbol() {
    let (_tmp, app) = build_test_router(|_| {}).await;

    let response = get(&app, "/api/cache/stock-data?type=quote").await;
    assert_eq!(response.status(), 400);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("symbol"));
}

#[tokio::test]
async fn stock_data_rejects_unknown_type() {
    let (_tmp, app) = build_test_router(|_| {}).await;

    let response = get(&app, "/api/cache/stock-data?symbol=AAPL&type=options").await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn stock_data_rejects_bad_candle_resolution() {
    let (_tmp, app) = build_test_router(|_| {}).await;

    let response = get(
        &app,
        "/api/cache/stock-data?symbol=AAPL&type=candles&resolution=2H&from=1700000000&to=1700600000",
    )
    .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn stock_data_upstream_failure_without_cache_is_500() {
    let (_tmp, app) = build_test_router(|_| {}).await;

    let response = get(&app, "/api/cache/stock-data?symbol=AAPL").await;
    assert_eq!(response.status(), 500);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Failed to fetch data");
    assert!(body["details"].is_string());

    // A failed call does not count against the budget
    let usage = json_body(get(&app, "/api/cache/usage").await).await;
    assert_eq!(usage["callsLastMinute"], 0);
}

#[tokio::test]
async fn stock_data_exhausted_budget_is_429() {
    let (_tmp, app) = build_test_router(|config| {
        config.max_calls_per_minute = Some(0);
    })
    .await;

    let response = get(&app, "/api/cache/stock-data?symbol=MSFT&type=profile").await;
    assert_eq!(response.status(), 429);
    assert_eq!(response.headers()[header::RETRY_AFTER], "60");
    let body = json_body(response).await;
    assert_eq!(body["retryAfter"], 60);
}

#[tokio::test]
async fn usage_reports_configured_budget() {
    let (_tmp, app) = build_test_router(|config| {
        config.max_calls_per_minute = Some(5);
        config.max_calls_per_day = Some(50);
    })
    .await;

    let response = get(&app, "/api/cache/usage").await;
    assert_eq!(response.status(), 200);
    let body = json_body(response).await;
    assert_eq!(body["callsLastMinute"], 0);
    assert_eq!(body["callsLastDay"], 0);
    assert_eq!(body["maxCallsPerMinute"], 5);
    assert_eq!(body["maxCallsPerDay"], 50);
}

#[tokio::test]
async fn chinese_name_from_dictionary() {
    let (_tmp, app) = build_test_router(|_| {}).await;

    let response = get(&app, "/api/stock/chinese-name?symbol=aapl").await;
    assert_eq!(response.status(), 200);
    let body = json_body(response).await;
    assert_eq!(body["ticker"], "AAPL");
    assert_eq!(body["name"], "苹果公司");
    assert_eq!(body["source"], "dictionary");
}

#[tokio::test]
async fn chinese_name_seeded_into_database() {
    let (_tmp, app) = build_test_router(|config| config.seed_names = true).await;

    let body = json_body(get(&app, "/api/stock/chinese-name?symbol=MSFT").await).await;
    assert_eq!(body["name"], "微软公司");
    assert_eq!(body["source"], "database");
}

#[tokio::test]
async fn chinese_name_unknown_and_missing() {
    let (_tmp, app) = build_test_router(|_| {}).await;

    let response = get(&app, "/api/stock/chinese-name?symbol=ZZZZZZ").await;
    assert_eq!(response.status(), 404);

    let response = get(&app, "/api/stock/chinese-name").await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn translate_without_providers_passes_through() {
    let (_tmp, app) = build_test_router(|_| {}).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/translate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"text":"Apple beats estimates"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), 200);
    let body = json_body(response).await;
    assert_eq!(body["translated_text"], "Apple beats estimates");
    assert_eq!(body["translated"], false);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/translate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"text":"   "}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), 400);
}
