//! Configuration loading from environment.

use std::env;
use std::time::Duration;

use exchange_rates::OpenExchangeRatesClient;

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub rates_app_id: String,
    pub rates_base_url: String,
    pub rates_timeout: Duration,
    /// OTLP collector endpoint; span export is disabled when unset.
    pub otlp_endpoint: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("rates_app_id", &"<redacted>")
            .field("rates_base_url", &self.rates_base_url)
            .field("rates_timeout", &self.rates_timeout)
            .field("otlp_endpoint", &self.otlp_endpoint)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()?;

        let database_url = var("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let rates_app_id = var("OPENEXCHANGERATES_APP_ID")
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("OPENEXCHANGERATES_APP_ID environment variable is required")
            })?;

        let rates_base_url = var("OPENEXCHANGERATES_BASE_URL")
            .unwrap_or_else(|| OpenExchangeRatesClient::DEFAULT_BASE_URL.to_string());

        let rates_timeout = match var("RATE_PROVIDER_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(secs.parse()?),
            None => OpenExchangeRatesClient::DEFAULT_TIMEOUT,
        };

        let otlp_endpoint = var("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|e| !e.is_empty());

        Ok(Self {
            port,
            database_url,
            rates_app_id,
            rates_base_url,
            rates_timeout,
            otlp_endpoint,
        })
    }
}
