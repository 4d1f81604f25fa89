//! Outbound Adapters
//!
//! Concrete implementations of the metrics and QR encoder ports.

mod metrics;
mod qr;

pub use metrics::OtelPaymentMetrics;
pub use qr::PngQrEncoder;
