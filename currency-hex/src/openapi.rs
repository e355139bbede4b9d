//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use currency_types::domain::{ConversionId, ConversionRecord, CurrencyCode};
use currency_types::dto::{
    ConvertCurrencyRequest, ConvertCurrencyResponse, CurrencyInfo, ExchangeRatesResponse,
    HistoryQuery,
};
use utoipa::OpenApi;

use crate::inbound::handlers::ErrorBody;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// List supported currencies
#[utoipa::path(
    get,
    path = "/api/currencies",
    tag = "currencies",
    responses(
        (status = 200, description = "Supported currencies in registry order", body = Vec<CurrencyInfo>)
    )
)]
async fn list_currencies() {}

/// Convert an amount between two currencies
#[utoipa::path(
    post,
    path = "/api/exchange/convert",
    tag = "exchange",
    request_body = ConvertCurrencyRequest,
    responses(
        (status = 200, description = "Conversion completed and recorded", body = ConvertCurrencyResponse),
        (status = 400, description = "Unsupported currency, missing rate or invalid amount", body = ErrorBody),
        (status = 503, description = "Exchange rate provider unavailable", body = ErrorBody)
    )
)]
async fn convert() {}

/// Get all rates relative to a base currency
#[utoipa::path(
    get,
    path = "/api/exchange/rates/{currency}",
    tag = "exchange",
    params(
        ("currency" = String, Path, description = "Base currency code, e.g. EUR")
    ),
    responses(
        (status = 200, description = "Rates relative to the base currency", body = ExchangeRatesResponse),
        (status = 400, description = "Currency is not supported", body = ErrorBody),
        (status = 503, description = "Exchange rate provider unavailable", body = ErrorBody)
    )
)]
async fn get_rates() {}

/// List recent conversions
#[utoipa::path(
    get,
    path = "/api/exchange/history",
    tag = "history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Most recent conversions, newest first", body = Vec<ConversionRecord>),
        (status = 400, description = "Limit is not positive", body = ErrorBody)
    )
)]
async fn get_history() {}

/// Get one conversion by ID
#[utoipa::path(
    get,
    path = "/api/exchange/history/{id}",
    tag = "history",
    params(
        ("id" = i64, Path, description = "Conversion ID")
    ),
    responses(
        (status = 200, description = "Conversion record", body = ConversionRecord),
        (status = 400, description = "Invalid conversion ID", body = ErrorBody),
        (status = 404, description = "Conversion not found", body = ErrorBody)
    )
)]
async fn get_history_entry() {}

/// OpenAPI documentation for the Currency Exchange API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Currency Exchange API",
        version = "1.0.0",
        description = "Converts amounts between ten fiat currencies using live exchange rates and keeps an audit history of every conversion.\n\nDecimal values are serialized as strings to preserve precision.",
        license(name = "MIT"),
    ),
    paths(
        health,
        list_currencies,
        convert,
        get_rates,
        get_history,
        get_history_entry,
    ),
    components(
        schemas(
            ConvertCurrencyRequest,
            ConvertCurrencyResponse,
            ExchangeRatesResponse,
            CurrencyInfo,
            CurrencyCode,
            ConversionId,
            ConversionRecord,
            ErrorBody,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "currencies", description = "Supported currency registry"),
        (name = "exchange", description = "Conversions and exchange rates"),
        (name = "history", description = "Conversion audit history"),
    )
)]
pub struct ApiDoc;
