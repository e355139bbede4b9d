//! Exchange rate provider port.
//!
//! This trait defines the interface for exchange rate sources.
//! Implementations can be HTTP clients, static tables, mocks, etc.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CurrencyCode;

/// Error type for rate provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Rate provider unreachable: {0}")]
    Transport(String),

    #[error("Rate provider returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed rate provider response: {0}")]
    Decode(String),
}

/// One snapshot of rates, all relative to `base`.
///
/// `rates` is optional because providers are not trusted to send it;
/// a missing map is a malformed snapshot, not an empty one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatestRates {
    /// Unix seconds at which the provider captured the rates.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub base: String,
    #[serde(default)]
    pub rates: Option<BTreeMap<String, Decimal>>,
}

/// Port trait for exchange rate providers.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync + 'static {
    /// Fetches the latest rates expressed relative to `base`.
    async fn latest(&self, base: CurrencyCode) -> Result<LatestRates, ProviderError>;
}

#[async_trait::async_trait]
impl<P: RateProvider + ?Sized> RateProvider for Arc<P> {
    async fn latest(&self, base: CurrencyCode) -> Result<LatestRates, ProviderError> {
        (**self).latest(base).await
    }
}
