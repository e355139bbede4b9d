//! OpenExchangeRates HTTP adapter.
//!
//! Docs for the endpoint: <https://docs.openexchangerates.org/reference/latest-json>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::CurrencyCode;
use crate::provider::{LatestRates, ProviderError, RateProvider};

/// Rate provider backed by the OpenExchangeRates `latest.json` endpoint.
pub struct OpenExchangeRatesClient {
    base_url: String,
    app_id: String,
    http: Client,
}

impl OpenExchangeRatesClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://openexchangerates.org/api";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a client against `base_url` whose requests time out after `timeout`.
    pub fn new(
        app_id: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            app_id: app_id.into(),
            http,
        })
    }

    /// Creates a client for the public API with the default timeout.
    pub fn with_app_id(app_id: impl Into<String>) -> Result<Self, ProviderError> {
        Self::new(app_id, Self::DEFAULT_BASE_URL, Self::DEFAULT_TIMEOUT)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn handle_response(&self, resp: reqwest::Response) -> Result<LatestRates, ProviderError> {
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))
        } else {
            // Error bodies look like {"error": true, "message": "...", "description": "..."}
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| {
                    v.get("description")
                        .or_else(|| v.get("message"))
                        .and_then(|m| m.as_str())
                        .map(String::from)
                })
                .unwrap_or(body);
            Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }
}

impl std::fmt::Debug for OpenExchangeRatesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenExchangeRatesClient")
            .field("base_url", &self.base_url)
            .field("app_id", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl RateProvider for OpenExchangeRatesClient {
    #[tracing::instrument(skip(self), fields(base = %base))]
    async fn latest(&self, base: CurrencyCode) -> Result<LatestRates, ProviderError> {
        tracing::debug!("Fetching latest rates from {}", self.base_url);

        let resp = self
            .http
            .get(format!("{}/latest.json", self.base_url))
            .query(&[("app_id", self.app_id.as_str()), ("base", base.code())])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Rate provider request failed");
                ProviderError::Transport(e.to_string())
            })?;

        self.handle_response(resp).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Rate provider returned an unusable response");
        })
    }
}
