//! Metrics sink port.

/// Counters for payment outcomes.
///
/// Implementations must be cheap and infallible; recording a metric never
/// fails a request.
pub trait PaymentMetrics: Send + Sync {
    /// Counts a payment that reached COMPLETED.
    fn increment_processed(&self, currency: &str);

    /// Counts a payment that reached FAILED.
    fn increment_failed(&self, currency: &str, reason: &str);
}
