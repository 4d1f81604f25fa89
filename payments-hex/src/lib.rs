//! # Payments Hex
//!
//! Application service layer, outbound adapters and HTTP adapter for the
//! payment record service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (orchestrates domain operations)
//! - `outbound/` - QR encoder and metrics sink adapters
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `R: PaymentRepository`, allowing
//! different repository implementations to be injected.

pub mod inbound;
pub mod openapi;
pub mod outbound;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use service::{DEFAULT_PAYMENT_BASE_URL, PaymentService};
