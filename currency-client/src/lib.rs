//! # Currency Client SDK
//!
//! A typed Rust client for the Currency Exchange API.

use currency_types::{
    ConversionId, ConversionRecord, ConvertCurrencyRequest, ConvertCurrencyResponse, CurrencyInfo,
    ExchangeRatesResponse,
};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Currency Exchange API client.
pub struct CurrencyClient {
    base_url: String,
    http: Client,
}

impl CurrencyClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Lists the supported currencies.
    pub async fn currencies(&self) -> Result<Vec<CurrencyInfo>, ClientError> {
        self.get("/api/currencies").await
    }

    /// Converts an amount; the server records the conversion.
    pub async fn convert(
        &self,
        from_currency: &str,
        to_currency: &str,
        amount: Decimal,
    ) -> Result<ConvertCurrencyResponse, ClientError> {
        let req = ConvertCurrencyRequest {
            from_currency: from_currency.to_string(),
            to_currency: to_currency.to_string(),
            amount,
        };
        self.post("/api/exchange/convert", &req).await
    }

    /// Gets all rates relative to `currency`.
    pub async fn rates(&self, currency: &str) -> Result<ExchangeRatesResponse, ClientError> {
        self.get(&format!("/api/exchange/rates/{}", currency)).await
    }

    /// Lists recent conversions. The server applies its default when `limit` is `None`.
    pub async fn history(&self, limit: Option<i64>) -> Result<Vec<ConversionRecord>, ClientError> {
        match limit {
            Some(limit) => {
                self.get(&format!("/api/exchange/history?limit={}", limit))
                    .await
            }
            None => self.get("/api/exchange/history").await,
        }
    }

    /// Gets one conversion by ID.
    pub async fn history_entry(&self, id: ConversionId) -> Result<ConversionRecord, ClientError> {
        self.get(&format!("/api/exchange/history/{}", id)).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
