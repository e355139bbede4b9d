//! Hardcoded rates for development and testing.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::CurrencyCode;
use crate::provider::{LatestRates, ProviderError, RateProvider};

/// A provider that serves a fixed USD-based table and never touches the network.
///
/// Every call to [`RateProvider::latest`] is counted so tests can assert
/// whether a lookup happened at all.
#[derive(Debug)]
pub struct StaticRateProvider {
    rates: Option<BTreeMap<String, Decimal>>,
    calls: AtomicUsize,
}

impl StaticRateProvider {
    /// Table built from the registry's reference rates. USD itself is
    /// implicit and therefore not listed, as with live providers.
    pub fn new() -> Self {
        let rates = CurrencyCode::all()
            .iter()
            .filter(|c| **c != CurrencyCode::USD)
            .map(|c| (c.code().to_string(), c.reference_rate()))
            .collect();
        Self::from_table(Some(rates))
    }

    /// Table with exactly the given USD-based entries.
    pub fn with_rates<K: Into<String>>(rates: impl IntoIterator<Item = (K, Decimal)>) -> Self {
        Self::from_table(Some(
            rates.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Adds or overrides one USD-based entry, keeping the rest of the table.
    pub fn with_rate(mut self, code: impl Into<String>, rate: Decimal) -> Self {
        self.rates
            .get_or_insert_with(BTreeMap::new)
            .insert(code.into(), rate);
        self
    }

    /// A provider whose snapshots carry no `rates` map at all.
    pub fn without_rates() -> Self {
        Self::from_table(None)
    }

    fn from_table(rates: Option<BTreeMap<String, Decimal>>) -> Self {
        Self {
            rates,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of snapshots served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for StaticRateProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for StaticRateProvider {
    async fn latest(&self, base: CurrencyCode) -> Result<LatestRates, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let rates = match (&self.rates, base) {
            (None, _) => None,
            (Some(table), CurrencyCode::USD) => Some(table.clone()),
            (Some(table), base) => {
                let divisor = table
                    .get(base.code())
                    .copied()
                    .filter(|r| !r.is_zero())
                    .ok_or_else(|| {
                        ProviderError::Status {
                            status: 400,
                            message: format!("Base currency {} is not available", base),
                        }
                    })?;
                let mut rebased: BTreeMap<String, Decimal> = table
                    .iter()
                    .filter(|(code, _)| code.as_str() != base.code())
                    .map(|(code, rate)| (code.clone(), *rate / divisor))
                    .collect();
                rebased.insert(CurrencyCode::USD.code().to_string(), Decimal::ONE / divisor);
                Some(rebased)
            }
        };

        Ok(LatestRates {
            timestamp: chrono::Utc::now().timestamp(),
            base: base.code().to_string(),
            rates,
        })
    }
}
