//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod metrics;
mod qr;
mod repository;

pub use metrics::PaymentMetrics;
pub use qr::QrEncoder;
pub use repository::PaymentRepository;
