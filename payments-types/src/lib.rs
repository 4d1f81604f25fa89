//! # Payments Types
//!
//! Domain types and port traits for the payment record service.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Payment, PaymentStatus)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Repository and application error types
//! - `signature/` - HMAC signing of inbound notifications

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;
pub mod signature;

// Re-export commonly used types
pub use domain::{DEFAULT_CURRENCY, Network, Payment, PaymentId, PaymentStatus};
pub use dto::*;
pub use error::{AppError, QrError, RepoError};
pub use ports::{PaymentMetrics, PaymentRepository, QrEncoder};
