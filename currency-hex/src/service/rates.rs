//! Rate derivation from a single base-relative snapshot.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use currency_types::{CurrencyCode, DomainError, RateProvider, ServiceError};

/// The currency every provider snapshot is expressed relative to.
pub const SNAPSHOT_BASE: CurrencyCode = CurrencyCode::USD;

type Snapshot = BTreeMap<String, Decimal>;

/// Derives direct, inverse and cross rates from the provider's snapshot.
///
/// A fresh snapshot is fetched for every call; nothing is cached.
pub struct RateService<P: RateProvider> {
    provider: P,
}

impl<P: RateProvider> RateService<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Units of `to` per one unit of `from`.
    ///
    /// Same-currency pairs return exactly 1 without contacting the provider.
    pub async fn rate(&self, from: CurrencyCode, to: CurrencyCode) -> Result<Decimal, ServiceError> {
        if from == to {
            return Ok(Decimal::ONE);
        }

        let snapshot = self.snapshot().await?;
        let not_found = || DomainError::RateNotFound {
            from: from.code().to_string(),
            to: to.code().to_string(),
        };

        if from == SNAPSHOT_BASE {
            let to_rate = snapshot.get(to.code()).copied().ok_or_else(not_found)?;
            return positive(to_rate);
        }

        let from_rate = snapshot.get(from.code()).copied().ok_or_else(not_found)?;

        if to == SNAPSHOT_BASE {
            return divide(Decimal::ONE, from_rate);
        }

        let to_rate = snapshot.get(to.code()).copied().ok_or_else(not_found)?;
        divide(to_rate, from_rate)
    }

    /// Every snapshot entry re-expressed relative to `base`.
    ///
    /// For a non-base currency the result also carries an entry for the
    /// snapshot base, which the raw snapshot leaves implicit.
    pub async fn all_rates(&self, base: CurrencyCode) -> Result<Snapshot, ServiceError> {
        let snapshot = self.snapshot().await?;

        if base == SNAPSHOT_BASE {
            return Ok(snapshot);
        }

        let base_rate = snapshot
            .get(base.code())
            .copied()
            .ok_or_else(|| DomainError::CurrencyNotSupported(base.code().to_string()))?;

        let mut rebased = snapshot
            .into_iter()
            .map(|(code, rate)| divide(rate, base_rate).map(|r| (code, r)))
            .collect::<Result<Snapshot, _>>()?;

        rebased.insert(base.code().to_string(), Decimal::ONE);
        rebased.insert(
            SNAPSHOT_BASE.code().to_string(),
            divide(Decimal::ONE, base_rate)?,
        );

        Ok(rebased)
    }

    async fn snapshot(&self) -> Result<Snapshot, ServiceError> {
        let latest = self.provider.latest(SNAPSHOT_BASE).await.map_err(|e| {
            tracing::warn!(error = %e, "exchange rate lookup failed");
            ServiceError::from(e)
        })?;

        match latest.rates {
            Some(rates) if !rates.is_empty() => Ok(rates),
            _ => Err(ServiceError::malformed(
                "Invalid response from exchange rate API",
            )),
        }
    }
}

/// A snapshot entry is usable only when strictly positive; anything else
/// means the snapshot itself is broken.
fn positive(rate: Decimal) -> Result<Decimal, ServiceError> {
    if rate <= Decimal::ZERO {
        return Err(ServiceError::malformed(format!(
            "Exchange rate API returned a non-positive rate: {}",
            rate
        )));
    }
    Ok(rate)
}

/// Exact quotient of two snapshot entries.
fn divide(numerator: Decimal, divisor: Decimal) -> Result<Decimal, ServiceError> {
    let divisor = positive(divisor)?;
    numerator
        .checked_div(divisor)
        .ok_or_else(|| ServiceError::malformed("Exchange rate out of range"))
}
