//! Data Transfer Objects (DTOs) for requests and responses.
//!
//! Field names follow the camelCase wire format the payment API has always
//! exposed (`qrCodeData`, `paymentUrl`, ...).

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Payment, PaymentId, PaymentStatus};

/// Identifier echoed back by the placeholder create endpoint.
pub const STUB_PAYMENT_ID: &str = "stub";

/// Content of every placeholder receipt.
pub const RECEIPT_STUB_CONTENT: &str = "Receipt stub";

/// Reason reported for failed payments when the notifier gives none.
pub const UNKNOWN_FAILURE_REASON: &str = "unknown";

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

// ─────────────────────────────────────────────────────────────────────────────
// Payment DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Arbitrary payment draft accepted by the create endpoint.
pub type CreatePaymentRequest = serde_json::Map<String, serde_json::Value>;

/// Query filters for listing payments.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaymentFilters {
    /// Only payments with this status
    pub status: Option<PaymentStatus>,
    /// Only payments in this currency
    #[param(example = "USD")]
    pub currency: Option<String>,
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
}

/// One page of payments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaymentPage {
    pub items: Vec<Payment>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl PaymentPage {
    /// The first page of an empty result set.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Status projection of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaymentStatusResponse {
    pub status: PaymentStatus,
}

/// QR code for a payment, base64-encoded PNG plus the URL it points to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeResponse {
    /// Base64-encoded PNG image
    pub qr_code_data: String,
    /// URL encoded in the QR code
    #[schema(example = "https://example.com/payment/3f2b8c1e")]
    pub payment_url: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Notification DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Inbound status update for a payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NotifyRequest {
    /// New status; when absent the notification is ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
    /// Failure reason, reported with FAILED notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "timeout")]
    pub reason: Option<String>,
}

impl NotifyRequest {
    pub fn with_status(status: PaymentStatus) -> Self {
        Self {
            status: Some(status),
            reason: None,
        }
    }

    /// Failure reason, `"unknown"` when missing or blank.
    pub fn reason_or_default(&self) -> &str {
        self.reason
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or(UNKNOWN_FAILURE_REASON)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cancellation & Receipts
// ─────────────────────────────────────────────────────────────────────────────

/// Request to cancel a payment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CancelPaymentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "customer request")]
    pub reason: Option<String>,
}

/// Result of a cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancellationResponse {
    pub status: PaymentStatus,
    pub cancellation_reason: Option<String>,
}

/// A payment receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReceiptResponse {
    pub id: PaymentId,
    pub content: String,
}
