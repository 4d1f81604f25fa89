//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use payments_types::domain::{Network, Payment, PaymentId, PaymentStatus};
use payments_types::dto::{
    CancelPaymentRequest, CancellationResponse, NotifyRequest, PaymentFilters, PaymentPage,
    PaymentStatusResponse, QrCodeResponse, ReceiptResponse,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Create a payment (placeholder: echoes the draft with id "stub", nothing is stored)
#[utoipa::path(
    post,
    path = "/api/payments",
    tag = "payments",
    request_body(content = inline(serde_json::Value), description = "Arbitrary payment draft"),
    responses(
        (status = 201, description = "Draft echoed back", body = inline(serde_json::Value), example = json!({"id": "stub", "amount": 2500}))
    )
)]
async fn create_payment() {}

/// List payments (placeholder: always an empty first page)
#[utoipa::path(
    get,
    path = "/api/payments",
    tag = "payments",
    params(PaymentFilters),
    responses(
        (status = 200, description = "Page of payments", body = PaymentPage)
    )
)]
async fn list_payments() {}

/// Get payment by ID
#[utoipa::path(
    get,
    path = "/api/payments/{id}",
    tag = "payments",
    params(
        ("id" = String, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "Payment", body = Payment),
        (status = 404, description = "Payment not found")
    )
)]
async fn get_payment() {}

/// Get full payment details
#[utoipa::path(
    get,
    path = "/api/payments/{id}/details",
    tag = "payments",
    params(
        ("id" = String, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "Payment", body = Payment),
        (status = 404, description = "Payment not found")
    )
)]
async fn get_payment_details() {}

/// Get payment status
#[utoipa::path(
    get,
    path = "/api/payments/{id}/status",
    tag = "payments",
    params(
        ("id" = String, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "Current status", body = PaymentStatusResponse),
        (status = 404, description = "Payment not found")
    )
)]
async fn get_payment_status() {}

/// Get payment by external reference
#[utoipa::path(
    get,
    path = "/api/payments/reference/{reference}",
    tag = "payments",
    params(
        ("reference" = String, Path, description = "External reference (matched against the payment ID)")
    ),
    responses(
        (status = 200, description = "Payment", body = Payment),
        (status = 404, description = "Payment not found")
    )
)]
async fn get_payment_by_reference() {}

/// QR code image pointing at the payment URL
#[utoipa::path(
    get,
    path = "/api/payments/{id}/qr",
    tag = "qr",
    params(
        ("id" = String, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "PNG image", content_type = "image/png"),
        (status = 404, description = "Payment not found")
    )
)]
async fn get_qr() {}

/// QR code as base64 text with the payment URL
#[utoipa::path(
    get,
    path = "/api/payments/{id}/qr-code",
    tag = "qr",
    params(
        ("id" = String, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "QR code", body = QrCodeResponse),
        (status = 404, description = "Payment not found")
    )
)]
async fn get_qr_code() {}

/// Apply a status notification
#[utoipa::path(
    post,
    path = "/api/payments/{id}/notify",
    tag = "notifications",
    request_body = NotifyRequest,
    security((), ("notify_signature" = [])),
    params(
        ("id" = String, Path, description = "Payment ID")
    ),
    responses(
        (status = 204, description = "Notification applied"),
        (status = 400, description = "Malformed notification"),
        (status = 401, description = "Missing or invalid signature"),
        (status = 404, description = "Payment not found")
    )
)]
async fn notify() {}

/// Cancel a payment (placeholder: nothing is stored)
#[utoipa::path(
    post,
    path = "/api/payments/{id}/cancel",
    tag = "payments",
    request_body = CancelPaymentRequest,
    params(
        ("id" = String, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "Cancellation result", body = CancellationResponse)
    )
)]
async fn cancel_payment() {}

/// Payment receipt (placeholder)
#[utoipa::path(
    get,
    path = "/api/payments/{id}/receipt",
    tag = "payments",
    params(
        ("id" = String, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "Receipt", body = ReceiptResponse)
    )
)]
async fn get_receipt() {}

/// Supported settlement networks
#[utoipa::path(
    get,
    path = "/api/payments/networks",
    tag = "reference",
    responses(
        (status = 200, description = "Network slugs", body = Vec<String>, example = json!(["ethereum", "polygon", "bsc"]))
    )
)]
async fn get_networks() {}

/// Reference exchange rates
#[utoipa::path(
    get,
    path = "/api/payments/exchange-rates",
    tag = "reference",
    responses(
        (status = 200, description = "USD price per token", body = inline(serde_json::Value), example = json!({"ETH/USD": 3000, "MATIC/USD": 1.5, "BNB/USD": 400}))
    )
)]
async fn get_exchange_rates() {}

/// OpenAPI documentation for the Payments API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payment Record Service API",
        version = "1.0.0",
        description = "Payment lookups, QR codes and status notifications.\n\n## Notification signatures\n\nWhen the server is configured with a notify secret, `POST /api/payments/{id}/notify` requires an `X-Signature` header holding the hex HMAC-SHA256 of the raw request body.",
        license(name = "MIT"),
    ),
    paths(
        health,
        create_payment,
        list_payments,
        get_payment,
        get_payment_details,
        get_payment_status,
        get_payment_by_reference,
        get_qr,
        get_qr_code,
        notify,
        cancel_payment,
        get_receipt,
        get_networks,
        get_exchange_rates,
    ),
    components(
        schemas(
            Payment,
            PaymentId,
            PaymentStatus,
            Network,
            PaymentPage,
            PaymentStatusResponse,
            QrCodeResponse,
            NotifyRequest,
            CancelPaymentRequest,
            CancellationResponse,
            ReceiptResponse,
        )
    ),

    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "payments", description = "Payment record operations"),
        (name = "qr", description = "QR codes for payment links"),
        (name = "notifications", description = "Inbound status updates"),
        (name = "reference", description = "Networks and exchange rates"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for signed notifications.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "notify_signature",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Signature"))),
            );
        }
    }
}
