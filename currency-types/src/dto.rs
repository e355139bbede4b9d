//! Data Transfer Objects (DTOs) for requests and responses.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use exchange_rates::CurrencyCode;

use crate::domain::ConversionRecord;
use crate::error::DomainError;

/// Default number of history entries returned when no limit is given.
pub const DEFAULT_HISTORY_LIMIT: i64 = 10;

/// Smallest amount a conversion request may carry.
pub const MIN_REQUEST_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

// ─────────────────────────────────────────────────────────────────────────────
// Conversion DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to convert an amount between two currencies.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertCurrencyRequest {
    /// Source currency code
    #[schema(example = "USD")]
    pub from_currency: String,
    /// Target currency code
    #[schema(example = "EUR")]
    pub to_currency: String,
    /// Amount to convert; at least 0.01
    #[schema(value_type = String, example = "100.00")]
    pub amount: Decimal,
}

impl ConvertCurrencyRequest {
    /// Rejects amounts below one hundredth of a unit.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.amount < MIN_REQUEST_AMOUNT {
            return Err(DomainError::InvalidAmount);
        }
        Ok(())
    }
}

/// Result of a completed conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertCurrencyResponse {
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
    #[schema(value_type = String, example = "100.00")]
    pub original_amount: Decimal,
    #[schema(value_type = String, example = "85.00")]
    pub converted_amount: Decimal,
    #[schema(value_type = String, example = "0.85")]
    pub exchange_rate: Decimal,
    pub conversion_date: DateTime<Utc>,
}

impl From<&ConversionRecord> for ConvertCurrencyResponse {
    fn from(record: &ConversionRecord) -> Self {
        Self {
            from_currency: record.from_currency,
            to_currency: record.to_currency,
            original_amount: record.amount,
            converted_amount: record.converted_amount,
            exchange_rate: record.exchange_rate,
            conversion_date: record.conversion_date,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rates DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// All known rates relative to one base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRatesResponse {
    pub base_currency: CurrencyCode,
    /// Units of each currency per one unit of the base currency
    #[schema(value_type = BTreeMap<String, String>)]
    pub rates: BTreeMap<String, Decimal>,
    pub timestamp: DateTime<Utc>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry & History DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// A supported currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CurrencyInfo {
    pub code: CurrencyCode,
    #[schema(example = "Euro")]
    pub name: String,
    #[schema(example = "€")]
    pub symbol: String,
}

impl From<CurrencyCode> for CurrencyInfo {
    fn from(code: CurrencyCode) -> Self {
        Self {
            code,
            name: code.name().to_string(),
            symbol: code.symbol().to_string(),
        }
    }
}

/// Query parameters for the history listing.
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Maximum number of records to return (default 10, at most 100)
    pub limit: Option<i64>,
}

impl HistoryQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_HISTORY_LIMIT)
    }
}
