//! HTTP request handlers.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json,
    extract::{
        ConnectInfo, FromRequest, FromRequestParts, Path, Query, Request, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use currency_types::{
    AppError, ConversionId, ConvertCurrencyRequest, ConvertCurrencyResponse, HistoryQuery,
    HistoryRepository, RateProvider, ServiceError,
};

use crate::ConverterService;
use crate::openapi::ApiDoc;

/// Application state shared across handlers.
pub struct AppState<P: RateProvider, R: HistoryRepository> {
    pub service: ConverterService<P, R>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        if let ServiceError::ExternalService {
            source: Some(source),
            ..
        } = &err
        {
            tracing::warn!(error = %source, "rate provider failure");
        }
        ApiError(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(AppError::BadRequest(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(AppError::BadRequest(rejection.body_text()))
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Currency 'XYZ' is not supported")]
    pub error: String,
    #[schema(example = 400)]
    pub code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: message,
            code: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Extractors
// ─────────────────────────────────────────────────────────────────────────────

/// `Json` whose rejections render as [`ApiError`].
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

/// `Query` whose rejections render as [`ApiError`].
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(ApiQuery(value))
    }
}

/// Socket peer address of the caller, present when the server was started
/// with connect info. Forwarding headers are not consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub Option<String>);

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        Ok(ClientIp(ip))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// List supported currencies.
pub async fn list_currencies<P: RateProvider, R: HistoryRepository>(
    State(state): State<Arc<AppState<P, R>>>,
) -> impl IntoResponse {
    Json(state.service.currencies())
}

/// Convert an amount and record it.
#[tracing::instrument(
    skip(state, req),
    fields(from = %req.from_currency, to = %req.to_currency, amount = %req.amount)
)]
pub async fn convert<P: RateProvider, R: HistoryRepository>(
    State(state): State<Arc<AppState<P, R>>>,
    ClientIp(client_ip): ClientIp,
    ApiJson(req): ApiJson<ConvertCurrencyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ServiceError::from)?;

    let record = state
        .service
        .convert(&req.from_currency, &req.to_currency, req.amount, client_ip)
        .await?;

    Ok(Json(ConvertCurrencyResponse::from(&record)))
}

/// All rates relative to the given currency.
#[tracing::instrument(skip(state))]
pub async fn get_rates<P: RateProvider, R: HistoryRepository>(
    State(state): State<Arc<AppState<P, R>>>,
    Path(currency): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let rates = state.service.exchange_rates(&currency).await?;
    Ok(Json(rates))
}

/// Recent conversion history.
#[tracing::instrument(skip(state))]
pub async fn get_history<P: RateProvider, R: HistoryRepository>(
    State(state): State<Arc<AppState<P, R>>>,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let history = state.service.recent_conversions(query.limit()).await?;
    Ok(Json(history))
}

/// Get one conversion by ID.
#[tracing::instrument(skip(state), fields(conversion_id = %id))]
pub async fn get_history_entry<P: RateProvider, R: HistoryRepository>(
    State(state): State<Arc<AppState<P, R>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let conversion_id: ConversionId = id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid conversion ID".into()))?;

    let record = state
        .service
        .conversion(conversion_id)
        .await
        .map_err(|e| match e {
            ServiceError::Repo(currency_types::RepoError::NotFound) => {
                ApiError(AppError::NotFound(format!("Conversion {}", conversion_id)))
            }
            other => other.into(),
        })?;

    Ok(Json(record))
}

/// The OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
