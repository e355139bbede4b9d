//! Application services.
//!
//! - `rates` - derives any currency pair from the provider's base-relative snapshot
//! - `strategy` - identity versus rate-based conversion
//! - `converter` - validation, conversion and history recording

pub mod converter;
pub mod rates;
pub mod strategy;

pub use converter::{ConverterService, MAX_HISTORY_LIMIT};
pub use rates::{RateService, SNAPSHOT_BASE};
pub use strategy::{AppliedRate, ConversionStrategy};
