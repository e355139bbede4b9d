//! Supported Currencies and Exchange Rate Providers
//!
//! This library owns the fixed registry of currencies the service converts
//! between, and the port through which live rates are fetched.
//!
//! Currencies are defined declaratively using a macro that generates the
//! `CurrencyCode` enum together with its metadata and lookups.
//!
//! # Adding a New Currency
//! Add a line to the `define_currencies!` invocation:
//! ```ignore
//! define_currencies! {
//!     // ... existing currencies ...
//!     NOK => ("NOK", "Norwegian Krone", "kr", 10.70),
//! }
//! ```
//!
//! # Example
//! ```
//! use exchange_rates::CurrencyCode;
//!
//! assert!(CurrencyCode::is_supported(" eur "));
//! assert!(!CurrencyCode::is_supported("XXX"));
//!
//! let yen: CurrencyCode = "jpy".parse().unwrap();
//! assert_eq!(yen.name(), "Japanese Yen");
//! ```

mod open_exchange_rates;
mod provider;
mod static_rates;

pub use open_exchange_rates::OpenExchangeRatesClient;
pub use provider::{LatestRates, ProviderError, RateProvider};
pub use static_rates::StaticRateProvider;

use rust_decimal::Decimal;

/// Error returned when parsing a code outside the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown currency: {0}")]
pub struct UnknownCurrency(pub String);

// ─────────────────────────────────────────────────────────────────────────────
// THE MACRO: Defines the CurrencyCode enum and its lookups
// ─────────────────────────────────────────────────────────────────────────────

/// Defines the supported currencies.
///
/// # Syntax
/// ```ignore
/// define_currencies! {
///     Variant => ("CODE", "Display name", "symbol", units_per_usd),
/// }
/// ```
///
/// `units_per_usd` is a reference rate used by [`StaticRateProvider`];
/// live conversions never read it.
macro_rules! define_currencies {
    (
        $(
            $name:ident => ($code:literal, $display:literal, $symbol:literal, $per_usd:tt)
        ),* $(,)?
    ) => {
        /// A currency from the fixed set the service supports.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize, utoipa::ToSchema,
        )]
        #[serde(rename_all = "UPPERCASE")]
        pub enum CurrencyCode {
            $($name),*
        }

        impl CurrencyCode {
            /// Three-letter ISO 4217 code.
            pub fn code(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $code),*
                }
            }

            /// Human readable name.
            pub fn name(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $display),*
                }
            }

            pub fn symbol(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $symbol),*
                }
            }

            /// Reference rate in units of this currency per one USD.
            pub fn reference_rate(&self) -> Decimal {
                match self {
                    $(CurrencyCode::$name => rust_decimal_macros::dec!($per_usd)),*
                }
            }

            /// Every supported currency, in registry order.
            pub fn all() -> &'static [CurrencyCode] {
                &[$(CurrencyCode::$name),*]
            }
        }

        impl std::str::FromStr for CurrencyCode {
            type Err = UnknownCurrency;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_uppercase().as_str() {
                    $($code => Ok(CurrencyCode::$name),)*
                    _ => Err(UnknownCurrency(s.to_string())),
                }
            }
        }
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// CURRENCY DEFINITIONS
// ─────────────────────────────────────────────────────────────────────────────

define_currencies! {
    USD => ("USD", "United States Dollar", "$", 1),
    EUR => ("EUR", "Euro", "€", 0.92),
    GBP => ("GBP", "British Pound Sterling", "£", 0.79),
    JPY => ("JPY", "Japanese Yen", "¥", 149.50),
    AUD => ("AUD", "Australian Dollar", "A$", 1.52),
    CAD => ("CAD", "Canadian Dollar", "C$", 1.36),
    CHF => ("CHF", "Swiss Franc", "CHF", 0.88),
    CNY => ("CNY", "Chinese Yuan", "¥", 7.24),
    SEK => ("SEK", "Swedish Krona", "kr", 10.45),
    NZD => ("NZD", "New Zealand Dollar", "NZ$", 1.65),
}

impl CurrencyCode {
    /// Returns true if the trimmed, uppercased code is in the registry.
    /// Blank input is never supported.
    pub fn is_supported(code: &str) -> bool {
        code.parse::<CurrencyCode>().is_ok()
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Iterates `(code, name)` pairs in registry order.
pub fn all_currencies() -> impl Iterator<Item = (&'static str, &'static str)> {
    CurrencyCode::all().iter().map(|c| (c.code(), c.name()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
