//! # Currency Types
//!
//! Domain types and port traits for the currency exchange service.
//! The crate performs no IO of its own: it holds data structures, business
//! rules and trait definitions. The currency registry and provider port come
//! from `exchange-rates`.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (ConversionRecord, NewConversion)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain, repository, service and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{ConversionId, ConversionRecord, CurrencyCode, NewConversion};
pub use dto::*;
pub use error::{AppError, DomainError, RepoError, ServiceError};
pub use ports::{HistoryRepository, HistorySession, LatestRates, ProviderError, RateProvider};
