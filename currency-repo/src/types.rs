//! Database row types for the SQLite and PostgreSQL adapters.

use sqlx::FromRow;

use currency_types::{ConversionId, ConversionRecord, CurrencyCode, RepoError};

#[cfg(feature = "postgres")]
use chrono::{DateTime, Utc};
#[cfg(feature = "postgres")]
use rust_decimal::Decimal;

/// Columns selected by every history query, in row-struct order.
pub const CONVERSION_COLUMNS: &str = "id, from_currency, to_currency, amount, converted_amount, \
     exchange_rate, conversion_date, client_ip";

fn parse_currency(code: &str) -> Result<CurrencyCode, RepoError> {
    code.parse::<CurrencyCode>()
        .map_err(|e| RepoError::Database(e.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL: native NUMERIC and TIMESTAMPTZ columns
// ─────────────────────────────────────────────────────────────────────────────

/// Conversion row from PostgreSQL.
#[cfg(feature = "postgres")]
#[derive(FromRow)]
pub struct DbConversion {
    pub id: i64,
    pub from_currency: String,
    pub to_currency: String,
    pub amount: Decimal,
    pub converted_amount: Decimal,
    pub exchange_rate: Decimal,
    pub conversion_date: DateTime<Utc>,
    pub client_ip: Option<String>,
}

#[cfg(feature = "postgres")]
impl DbConversion {
    pub fn into_domain(self) -> Result<ConversionRecord, RepoError> {
        Ok(ConversionRecord {
            id: ConversionId::new(self.id),
            from_currency: parse_currency(&self.from_currency)?,
            to_currency: parse_currency(&self.to_currency)?,
            amount: self.amount,
            converted_amount: self.converted_amount,
            exchange_rate: self.exchange_rate,
            conversion_date: self.conversion_date,
            client_ip: self.client_ip,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SQLite: decimals and timestamps stored as text
// ─────────────────────────────────────────────────────────────────────────────

/// Conversion row from SQLite.
#[cfg(feature = "sqlite")]
#[derive(FromRow)]
pub struct DbConversionText {
    pub id: i64,
    pub from_currency: String,
    pub to_currency: String,
    pub amount: String,
    pub converted_amount: String,
    pub exchange_rate: String,
    pub conversion_date: String,
    pub client_ip: Option<String>,
}

#[cfg(feature = "sqlite")]
impl DbConversionText {
    pub fn into_domain(self) -> Result<ConversionRecord, RepoError> {
        let decimal = |s: &str| {
            s.parse::<rust_decimal::Decimal>()
                .map_err(|e| RepoError::Database(format!("bad decimal '{}': {}", s, e)))
        };

        let conversion_date = chrono::DateTime::parse_from_rfc3339(&self.conversion_date)
            .map_err(|e| RepoError::Database(e.to_string()))?
            .with_timezone(&chrono::Utc);

        Ok(ConversionRecord {
            id: ConversionId::new(self.id),
            from_currency: parse_currency(&self.from_currency)?,
            to_currency: parse_currency(&self.to_currency)?,
            amount: decimal(&self.amount)?,
            converted_amount: decimal(&self.converted_amount)?,
            exchange_rate: decimal(&self.exchange_rate)?,
            conversion_date,
            client_ip: self.client_ip,
        })
    }
}

/// Fixed-width UTC timestamp so that text ordering equals time ordering.
#[cfg(feature = "sqlite")]
pub fn timestamp_text(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
