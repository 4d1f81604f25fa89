//! Domain models for the payment service.

pub mod payment;

pub use exchange_rates::Network;
pub use payment::{DEFAULT_CURRENCY, Payment, PaymentId, PaymentStatus};
