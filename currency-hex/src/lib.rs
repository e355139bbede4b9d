//! # Currency Hex
//!
//! Application service layer and HTTP adapter for the currency exchange service.
//!
//! ## Architecture
//!
//! - `service/` - Application services (rates, strategy selection, conversion)
//! - `inbound/` - HTTP adapter (Axum server)
//! - `openapi` - OpenAPI document served by the HTTP adapter
//!
//! The services are generic over `P: RateProvider` and `R: HistoryRepository`,
//! allowing different provider and repository implementations to be injected.

pub mod inbound;
pub mod openapi;
pub mod service;


pub use service::{ConverterService, RateService};
