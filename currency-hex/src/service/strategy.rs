//! Same-currency versus rate-based conversion.

use rust_decimal::{Decimal, RoundingStrategy};

use currency_types::{CurrencyCode, DomainError, RateProvider, ServiceError};

use super::rates::RateService;

/// Decimal places of every rate-based converted amount.
pub const AMOUNT_SCALE: u32 = 2;

/// How an amount gets from one currency to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStrategy {
    /// Source and target are the same currency: the amount passes through untouched.
    Identity,
    /// Multiply by the live rate and round.
    RateBased,
}

/// Outcome of applying a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedRate {
    pub converted_amount: Decimal,
    /// The rate the conversion actually used.
    pub rate: Decimal,
}

impl ConversionStrategy {
    pub fn select(from: CurrencyCode, to: CurrencyCode) -> Self {
        if from == to {
            ConversionStrategy::Identity
        } else {
            ConversionStrategy::RateBased
        }
    }

    pub async fn apply<P: RateProvider>(
        self,
        rates: &RateService<P>,
        amount: Decimal,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> Result<AppliedRate, ServiceError> {
        match self {
            ConversionStrategy::Identity => Ok(AppliedRate {
                converted_amount: amount,
                rate: Decimal::ONE,
            }),
            ConversionStrategy::RateBased => {
                let rate = rates.rate(from, to).await?;
                let converted_amount = amount
                    .checked_mul(rate)
                    .ok_or(DomainError::InvalidAmount)?
                    .round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);

                Ok(AppliedRate {
                    converted_amount,
                    rate,
                })
            }
        }
    }
}
