//! OpenTelemetry metrics sink.

use opentelemetry::{KeyValue, global, metrics::Counter};

use payments_types::PaymentMetrics;

/// Records payment outcomes as OpenTelemetry counters on the global meter
/// provider. Without an installed provider the counters are no-ops.
pub struct OtelPaymentMetrics {
    processed: Counter<u64>,
    failed: Counter<u64>,
}

impl Default for OtelPaymentMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl OtelPaymentMetrics {
    pub fn new() -> Self {
        let meter = global::meter("payments-service");

        Self {
            processed: meter
                .u64_counter("payments_processed_total")
                .with_description("Payments that reached COMPLETED")
                .build(),
            failed: meter
                .u64_counter("payments_failed_total")
                .with_description("Payments that reached FAILED")
                .build(),
        }
    }
}

impl PaymentMetrics for OtelPaymentMetrics {
    fn increment_processed(&self, currency: &str) {
        tracing::debug!(currency, "payments_processed_total += 1");
        self.processed
            .add(1, &[KeyValue::new("currency", currency.to_string())]);
    }

    fn increment_failed(&self, currency: &str, reason: &str) {
        tracing::debug!(currency, reason, "payments_failed_total += 1");
        self.failed.add(
            1,
            &[
                KeyValue::new("currency", currency.to_string()),
                KeyValue::new("reason", reason.to_string()),
            ],
        );
    }
}
