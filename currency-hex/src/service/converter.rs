//! Currency Converter Application Service
//!
//! Orchestrates validation, rate lookup and history persistence through the ports.
//! Contains NO infrastructure logic - pure business orchestration.

use chrono::Utc;
use rust_decimal::Decimal;

use currency_types::{
    ConversionId, ConversionRecord, CurrencyCode, CurrencyInfo, DomainError,
    ExchangeRatesResponse, HistoryRepository, HistorySession, NewConversion, RateProvider,
    RepoError, ServiceError,
};

use super::rates::RateService;
use super::strategy::ConversionStrategy;

/// Upper bound on the number of history records a single listing returns.
pub const MAX_HISTORY_LIMIT: i64 = 100;

/// Application service for conversions and history.
///
/// Generic over `P: RateProvider` and `R: HistoryRepository` - the adapters are injected at compile time.
/// This enables:
/// - Swapping the rate source or the database without code changes
/// - Testing with a static provider and an in-memory repo
/// - Compile-time checks for port implementation
pub struct ConverterService<P: RateProvider, R: HistoryRepository> {
    rates: RateService<P>,
    repo: R,
}

fn supported(code: &str) -> Result<CurrencyCode, DomainError> {
    code.parse()
        .map_err(|_| DomainError::CurrencyNotSupported(code.to_string()))
}

impl<P: RateProvider, R: HistoryRepository> ConverterService<P, R> {
    /// Creates a new converter service with the given provider and repository.
    pub fn new(provider: P, repo: R) -> Self {
        Self {
            rates: RateService::new(provider),
            repo,
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Conversion
    // ─────────────────────────────────────────────────────────────────────────────

    /// Converts `amount` and durably records the result.
    ///
    /// Nothing is written unless every step succeeds.
    #[tracing::instrument(skip(self, client_ip))]
    pub async fn convert(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
        client_ip: Option<String>,
    ) -> Result<ConversionRecord, ServiceError> {
        let from = supported(from)?;
        let to = supported(to)?;

        if amount <= Decimal::ZERO {
            return Err(DomainError::InvalidAmount.into());
        }

        let applied = ConversionStrategy::select(from, to)
            .apply(&self.rates, amount, from, to)
            .await?;

        let new = NewConversion::new(
            from,
            to,
            amount,
            applied.converted_amount,
            applied.rate,
            client_ip,
        );

        let mut session = self.repo.begin().await?;
        let record = session.add(new).await?;
        session.commit().await?;

        tracing::info!(
            id = %record.id,
            from = %record.from_currency,
            to = %record.to_currency,
            rate = %record.exchange_rate,
            "conversion recorded"
        );

        Ok(record)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Rates & Registry
    // ─────────────────────────────────────────────────────────────────────────────

    /// All rates relative to `base`.
    pub async fn exchange_rates(&self, base: &str) -> Result<ExchangeRatesResponse, ServiceError> {
        let base = supported(base)?;
        let rates = self.rates.all_rates(base).await?;

        Ok(ExchangeRatesResponse {
            base_currency: base,
            rates,
            timestamp: Utc::now(),
        })
    }

    /// Lists the supported currencies in registry order.
    pub fn currencies(&self) -> Vec<CurrencyInfo> {
        CurrencyCode::all().iter().copied().map(CurrencyInfo::from).collect()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // History
    // ─────────────────────────────────────────────────────────────────────────────

    /// Most recent conversions, newest first, at most [`MAX_HISTORY_LIMIT`].
    pub async fn recent_conversions(&self, limit: i64) -> Result<Vec<ConversionRecord>, ServiceError> {
        let limit = limit.min(MAX_HISTORY_LIMIT);
        self.repo.get_recent(limit).await.map_err(Into::into)
    }

    /// Gets a conversion by ID.
    pub async fn conversion(&self, id: ConversionId) -> Result<ConversionRecord, ServiceError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::Repo(RepoError::NotFound))
    }

    /// Lists every stored conversion, newest first.
    pub async fn all_conversions(&self) -> Result<Vec<ConversionRecord>, ServiceError> {
        self.repo.get_all().await.map_err(Into::into)
    }
}
