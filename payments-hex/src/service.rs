//! Payment Application Service
//!
//! Orchestrates payment lookups, QR rendering and status notifications
//! through the repository, metrics and QR encoder ports.
//! Contains NO infrastructure logic - pure business orchestration.

use std::collections::BTreeMap;
use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD as B64};
use serde_json::Number;

use payments_types::{
    AppError, CancellationResponse, CreatePaymentRequest, NotifyRequest, Payment, PaymentFilters,
    PaymentId, PaymentMetrics, PaymentPage, PaymentRepository, PaymentStatus,
    PaymentStatusResponse, QrCodeResponse, QrEncoder, RECEIPT_STUB_CONTENT, ReceiptResponse,
    STUB_PAYMENT_ID,
};

/// Base URL used for payment links when none is configured.
pub const DEFAULT_PAYMENT_BASE_URL: &str = "https://example.com";

/// JSON number for a rate; `None` for non-finite values.
fn rate_number(rate: f64) -> Option<Number> {
    if rate.fract() == 0.0 && rate.abs() < i64::MAX as f64 {
        Some(Number::from(rate as i64))
    } else {
        Number::from_f64(rate)
    }
}

/// Application service for payment operations.
///
/// Generic over `R: PaymentRepository` - the adapter is injected at compile time.
/// The metrics sink and QR encoder are shared trait objects so one instance
/// can be reused across services and swapped in tests.
pub struct PaymentService<R: PaymentRepository> {
    repo: R,
    metrics: Arc<dyn PaymentMetrics>,
    qr: Arc<dyn QrEncoder>,
    base_url: String,
}

impl<R: PaymentRepository> PaymentService<R> {
    /// Creates a new payment service with the given collaborators.
    pub fn new(repo: R, metrics: Arc<dyn PaymentMetrics>, qr: Arc<dyn QrEncoder>) -> Self {
        Self {
            repo,
            metrics,
            qr,
            base_url: DEFAULT_PAYMENT_BASE_URL.to_string(),
        }
    }

    /// Overrides the base URL payment links are built from.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Returns the QR encoder.
    pub fn qr_encoder(&self) -> &dyn QrEncoder {
        self.qr.as_ref()
    }

    /// URL a customer visits to pay.
    pub fn payment_url(&self, id: &PaymentId) -> String {
        format!("{}/payment/{}", self.base_url, id)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Lookups
    // ─────────────────────────────────────────────────────────────────────────────

    /// Gets a payment by ID, failing with `NotFound` when absent.
    pub async fn get_payment_details(&self, id: &PaymentId) -> Result<Payment, AppError> {
        self.repo
            .find_payment(id)
            .await
            .map_err(Into::into)
            .and_then(|opt| opt.ok_or_else(AppError::payment_not_found))
    }

    /// Gets the status of a payment.
    pub async fn get_payment_status(
        &self,
        id: &PaymentId,
    ) -> Result<PaymentStatusResponse, AppError> {
        let payment = self.get_payment_details(id).await?;
        Ok(PaymentStatusResponse {
            status: payment.status,
        })
    }

    /// Alias of [`Self::get_payment_details`].
    pub async fn get_payment_by_id(&self, id: &PaymentId) -> Result<Payment, AppError> {
        self.get_payment_details(id).await
    }

    /// Finds a payment by external reference.
    ///
    /// Records carry no separate reference column, so the reference is
    /// matched against the payment ID.
    pub async fn get_payment_by_reference(&self, reference: &str) -> Result<Payment, AppError> {
        self.get_payment_details(&PaymentId::from(reference)).await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // QR Codes
    // ─────────────────────────────────────────────────────────────────────────────

    /// Renders the payment URL of an existing payment as a QR image.
    pub async fn generate_qr(&self, id: &PaymentId) -> Result<Vec<u8>, AppError> {
        let payment = self.get_payment_details(id).await?;
        let url = self.payment_url(&payment.id);
        Ok(self.qr.encode(&url)?)
    }

    /// Same as [`Self::generate_qr`], base64-encoded alongside the URL.
    pub async fn generate_qr_code(&self, id: &PaymentId) -> Result<QrCodeResponse, AppError> {
        let image = self.generate_qr(id).await?;
        Ok(QrCodeResponse {
            qr_code_data: B64.encode(image),
            payment_url: self.payment_url(id),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Notifications
    // ─────────────────────────────────────────────────────────────────────────────

    /// Applies an inbound status notification.
    ///
    /// Any status may overwrite any other, and repeated notifications are
    /// applied (and counted) every time.
    pub async fn handle_notify(&self, id: &PaymentId, req: NotifyRequest) -> Result<(), AppError> {
        let mut payment = self.get_payment_details(id).await?;

        let Some(status) = req.status else {
            tracing::debug!(payment_id = %id, "Notification without status ignored");
            return Ok(());
        };

        let previous = payment.status;
        payment.set_status(status);
        self.repo.save_payment(&payment).await?;

        tracing::info!(payment_id = %id, from = %previous, to = %status, "Payment status updated");

        let currency = payment.currency_or_default();
        match status {
            PaymentStatus::Completed => self.metrics.increment_processed(currency),
            PaymentStatus::Failed => self
                .metrics
                .increment_failed(currency, req.reason_or_default()),
            _ => {}
        }

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Static Tables
    // ─────────────────────────────────────────────────────────────────────────────

    /// Networks payments can settle on.
    pub fn get_networks(&self) -> Vec<String> {
        exchange_rates::supported_networks()
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Reference USD rates of each network's token.
    ///
    /// Whole-number rates are reported as JSON integers (`3000`, not `3000.0`).
    pub fn get_exchange_rates(&self) -> BTreeMap<String, Number> {
        exchange_rates::usd_quotes()
            .into_iter()
            .filter_map(|(pair, rate)| rate_number(rate).map(|n| (pair, n)))
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Placeholders
    // ─────────────────────────────────────────────────────────────────────────────

    /// Placeholder: echoes the draft with a fixed `id` and stores nothing.
    ///
    /// Fields of the draft win over the fixed id, so a draft carrying its own
    /// `id` is echoed unchanged.
    pub async fn create_payment(
        &self,
        draft: CreatePaymentRequest,
    ) -> Result<CreatePaymentRequest, AppError> {
        let mut created = CreatePaymentRequest::new();
        created.insert("id".into(), STUB_PAYMENT_ID.into());
        created.extend(draft);
        Ok(created)
    }

    /// Placeholder: always the first page of an empty result set.
    pub async fn get_payments(&self, _filters: PaymentFilters) -> Result<PaymentPage, AppError> {
        Ok(PaymentPage::empty())
    }

    /// Placeholder: reports the payment as FAILED without touching the store.
    pub async fn cancel_payment(
        &self,
        _id: &PaymentId,
        reason: Option<String>,
    ) -> Result<CancellationResponse, AppError> {
        Ok(CancellationResponse {
            status: PaymentStatus::Failed,
            cancellation_reason: reason,
        })
    }

    /// Placeholder receipt.
    pub async fn generate_receipt(&self, id: &PaymentId) -> Result<ReceiptResponse, AppError> {
        Ok(ReceiptResponse {
            id: id.clone(),
            content: RECEIPT_STUB_CONTENT.to_string(),
        })
    }
}
