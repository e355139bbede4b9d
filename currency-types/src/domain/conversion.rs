//! Conversion history domain model.

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use exchange_rates::CurrencyCode;

use crate::error::DomainError;

/// Maximum stored length of a client address (fits an IPv6 literal).
pub const MAX_CLIENT_IP_LEN: usize = 45;

/// Store-assigned, sequential identifier of a conversion record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct ConversionId(i64);

impl ConversionId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ConversionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ConversionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// A conversion that has been computed but not yet stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewConversion {
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
    pub amount: Decimal,
    pub converted_amount: Decimal,
    pub exchange_rate: Decimal,
    pub conversion_date: DateTime<Utc>,
    pub client_ip: Option<String>,
}

impl NewConversion {
    /// Stamps the conversion with the current UTC time, at the microsecond
    /// precision every store keeps.
    pub fn new(
        from_currency: CurrencyCode,
        to_currency: CurrencyCode,
        amount: Decimal,
        converted_amount: Decimal,
        exchange_rate: Decimal,
        client_ip: Option<String>,
    ) -> Self {
        Self {
            from_currency,
            to_currency,
            amount,
            converted_amount,
            exchange_rate,
            conversion_date: Utc::now().trunc_subsecs(6),
            client_ip: client_ip.map(|ip| ip.chars().take(MAX_CLIENT_IP_LEN).collect()),
        }
    }
}

/// The durable audit entry for one completed conversion.
///
/// Records are immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRecord {
    pub id: ConversionId,
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
    /// Amount in the source currency
    #[schema(value_type = String, example = "100")]
    pub amount: Decimal,
    /// Amount in the target currency, rounded to 2 decimal places
    #[schema(value_type = String, example = "85.00")]
    pub converted_amount: Decimal,
    /// Units of target currency per unit of source currency
    #[schema(value_type = String, example = "0.85")]
    pub exchange_rate: Decimal,
    pub conversion_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<String>,
}

impl ConversionRecord {
    /// Attaches a store-assigned id to a pending conversion.
    pub fn from_new(id: ConversionId, new: NewConversion) -> Self {
        Self {
            id,
            from_currency: new.from_currency,
            to_currency: new.to_currency,
            amount: new.amount,
            converted_amount: new.converted_amount,
            exchange_rate: new.exchange_rate,
            conversion_date: new.conversion_date,
            client_ip: new.client_ip,
        }
    }
}

/// Validates the `count` argument of a recent-history lookup.
pub fn ensure_positive_count(count: i64) -> Result<i64, DomainError> {
    if count <= 0 {
        return Err(DomainError::InvalidArgument(
            "Count must be greater than zero".into(),
        ));
    }
    Ok(count)
}
