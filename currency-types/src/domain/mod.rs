//! Domain models for the currency exchange service.

pub mod conversion;

pub use conversion::{
    ConversionId, ConversionRecord, MAX_CLIENT_IP_LEN, NewConversion, ensure_positive_count,
};
pub use exchange_rates::CurrencyCode;
