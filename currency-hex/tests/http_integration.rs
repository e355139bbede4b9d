//! HTTP-level tests for the currency exchange API.
//!
//! These tests drive the full router (handlers, error mapping and
//! middleware stack) against an in-memory SQLite store and a static
//! rate provider.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Method, Request, StatusCode},
};
use currency_hex::{ConverterService, inbound::HttpServer};
use currency_repo::SqliteRepo;
use exchange_rates::StaticRateProvider;
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use serde_json::Value;
use tower::ServiceExt;

/// Helper to create a router backed by the given provider.
async fn create_app(provider: StaticRateProvider) -> (Router, Arc<StaticRateProvider>) {
    let provider = Arc::new(provider);
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let service = ConverterService::new(provider.clone(), repo);
    (HttpServer::new(service).router(), provider)
}

async fn default_app() -> Router {
    let provider = StaticRateProvider::with_rates([("EUR", dec!(0.85)), ("GBP", dec!(0.73))]);
    create_app(provider).await.0
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn convert_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/exchange/convert")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Sends a request and returns the status and parsed JSON body.
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let app = default_app().await;

    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_list_currencies() {
    let app = default_app().await;

    let (status, body) = send(&app, get("/api/currencies")).await;

    assert_eq!(status, StatusCode::OK);
    let currencies = body.as_array().unwrap();
    assert_eq!(currencies.len(), 10);
    assert_eq!(currencies[0]["code"], "USD");
    assert_eq!(currencies[1]["name"], "Euro");
}

#[tokio::test]
async fn test_convert_and_read_back_history() {
    let app = default_app().await;

    let (status, body) = send(
        &app,
        convert_request(r#"{"fromCurrency":"USD","toCurrency":"EUR","amount":100}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fromCurrency"], "USD");
    assert_eq!(body["toCurrency"], "EUR");
    assert_eq!(body["originalAmount"], "100");
    assert_eq!(body["convertedAmount"], "85.00");
    assert_eq!(body["exchangeRate"], "0.85");
    assert!(body["conversionDate"].is_string());

    let (status, history) = send(&app, get("/api/exchange/history")).await;
    assert_eq!(status, StatusCode::OK);
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["convertedAmount"], "85.00");

    let id = entries[0]["id"].as_i64().unwrap();
    let (status, entry) = send(&app, get(&format!("/api/exchange/history/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["id"], id);
    assert_eq!(entry["exchangeRate"], "0.85");
}

#[tokio::test]
async fn test_convert_records_peer_address_not_forwarded_header() {
    let app = default_app().await;

    let mut request = Request::builder()
        .method(Method::POST)
        .uri("/api/exchange/convert")
        .header("Content-Type", "application/json")
        .header("X-Forwarded-For", "198.51.100.4, 10.0.0.1")
        .body(Body::from(
            r#"{"fromCurrency":"eur","toCurrency":"gbp","amount":"10"}"#,
        ))
        .unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 10], 40000))));
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fromCurrency"], "EUR");

    let (_, history) = send(&app, get("/api/exchange/history?limit=1")).await;
    assert_eq!(history[0]["clientIp"], "192.0.2.10");
}

#[tokio::test]
async fn test_convert_without_peer_address_records_no_client_ip() {
    let app = default_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/exchange/convert")
        .header("Content-Type", "application/json")
        .header("X-Forwarded-For", "198.51.100.4")
        .body(Body::from(
            r#"{"fromCurrency":"USD","toCurrency":"EUR","amount":1}"#,
        ))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let (_, history) = send(&app, get("/api/exchange/history?limit=1")).await;
    assert!(history[0].get("clientIp").is_none());
}

#[tokio::test]
async fn test_same_currency_skips_provider() {
    let provider = StaticRateProvider::with_rates([("EUR", dec!(0.85))]);
    let (app, provider) = create_app(provider).await;

    let (status, body) = send(
        &app,
        convert_request(r#"{"fromCurrency":"JPY","toCurrency":"JPY","amount":"1234.5"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["convertedAmount"], "1234.5");
    assert_eq!(body["exchangeRate"], "1");
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_convert_unsupported_currency_is_bad_request() {
    let app = default_app().await;

    let (status, body) = send(
        &app,
        convert_request(r#"{"fromCurrency":"XYZ","toCurrency":"EUR","amount":100}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert!(body["error"].as_str().unwrap().contains("XYZ"));

    let (_, history) = send(&app, get("/api/exchange/history")).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_convert_negative_amount_is_bad_request() {
    let app = default_app().await;

    let (status, body) = send(
        &app,
        convert_request(r#"{"fromCurrency":"USD","toCurrency":"EUR","amount":-5}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Amount must be greater than zero");
}

#[tokio::test]
async fn test_convert_sub_cent_amount_is_bad_request() {
    let app = default_app().await;

    let (status, body) = send(
        &app,
        convert_request(r#"{"fromCurrency":"USD","toCurrency":"USD","amount":"0.005"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Amount must be greater than zero");

    let (_, history) = send(&app, get("/api/exchange/history")).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_convert_malformed_body_uses_error_contract() {
    let app = default_app().await;

    for body in [
        r#"{"fromCurrency":"USD","toCurrency":"EUR"}"#,
        r#"{"fromCurrency":"USD","toCurrency":"EUR","amount":"abc"}"#,
        "not json",
    ] {
        let (status, json) = send(&app, convert_request(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(json["code"], 400);
        assert!(json["error"].is_string());
    }
}

#[tokio::test]
async fn test_convert_without_json_content_type_is_bad_request() {
    let app = default_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/exchange/convert")
        .body(Body::from(
            r#"{"fromCurrency":"USD","toCurrency":"EUR","amount":1}"#,
        ))
        .unwrap();
    let (status, json) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], 400);
}

#[tokio::test]
async fn test_missing_rate_is_bad_request() {
    let app = default_app().await;

    let (status, _) = send(
        &app,
        convert_request(r#"{"fromCurrency":"USD","toCurrency":"CHF","amount":1}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_provider_without_rates_is_service_unavailable() {
    let (app, _) = create_app(StaticRateProvider::without_rates()).await;

    let (status, body) = send(
        &app,
        convert_request(r#"{"fromCurrency":"USD","toCurrency":"EUR","amount":100}"#),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], 503);

    let (status, _) = send(&app, get("/api/exchange/rates/EUR")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_rates_for_base_currency() {
    let app = default_app().await;

    let (status, body) = send(&app, get("/api/exchange/rates/eur")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["baseCurrency"], "EUR");
    assert_eq!(body["rates"]["EUR"], "1");
    assert!(body["rates"]["USD"].is_string());
    assert!(body["rates"]["GBP"].is_string());
}

#[tokio::test]
async fn test_rates_for_unsupported_currency() {
    let app = default_app().await;

    let (status, body) = send(&app, get("/api/exchange/rates/INR")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("INR"));
}

#[tokio::test]
async fn test_history_limit_validation() {
    let app = default_app().await;

    let (status, _) = send(&app, get("/api/exchange/history?limit=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, get("/api/exchange/history?limit=500")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get("/api/exchange/history?limit=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_history_entry_errors() {
    let app = default_app().await;

    let (status, _) = send(&app, get("/api/exchange/history/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, get("/api/exchange/history/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = default_app().await;

    let (status, body) = send(&app, get("/api-docs/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["openapi"].is_string());
    assert!(body["paths"]["/api/exchange/convert"].is_object());
}
