//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use payments_types::{
    AppError, CancelPaymentRequest, CreatePaymentRequest, NotifyRequest, PaymentFilters,
    PaymentId, PaymentRepository,
    signature::{SIGNATURE_HEADER, verify_notification},
};

use crate::PaymentService;

/// Application state shared across handlers.
pub struct AppState<R: PaymentRepository> {
    pub service: Arc<PaymentService<R>>,
    /// Shared secret notifications must be signed with, if any.
    pub notify_secret: Option<String>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Parses an optional JSON body; an empty body yields `T::default()`.
fn parse_optional_json<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("Invalid JSON: {}", e)))
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Payments
// ─────────────────────────────────────────────────────────────────────────────

/// Create a payment (placeholder, nothing is stored).
#[tracing::instrument(skip(state, draft))]
pub async fn create_payment<R: PaymentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Json(draft): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.service.create_payment(draft).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List payments.
#[tracing::instrument(skip(state))]
pub async fn list_payments<R: PaymentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Query(filters): Query<PaymentFilters>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.service.get_payments(filters).await?;
    Ok(Json(page))
}

/// Get payment by ID.
#[tracing::instrument(skip(state), fields(payment_id = %id))]
pub async fn get_payment<R: PaymentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = state.service.get_payment_by_id(&PaymentId::from(id)).await?;
    Ok(Json(payment))
}

/// Get full payment details.
#[tracing::instrument(skip(state), fields(payment_id = %id))]
pub async fn get_payment_details<R: PaymentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = state
        .service
        .get_payment_details(&PaymentId::from(id))
        .await?;
    Ok(Json(payment))
}

/// Get payment status.
#[tracing::instrument(skip(state), fields(payment_id = %id))]
pub async fn get_payment_status<R: PaymentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let status = state
        .service
        .get_payment_status(&PaymentId::from(id))
        .await?;
    Ok(Json(status))
}

/// Get payment by external reference.
#[tracing::instrument(skip(state), fields(reference = %reference))]
pub async fn get_payment_by_reference<R: PaymentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(reference): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = state.service.get_payment_by_reference(&reference).await?;
    Ok(Json(payment))
}

// ─────────────────────────────────────────────────────────────────────────────
// QR Codes
// ─────────────────────────────────────────────────────────────────────────────

/// QR code image for a payment.
#[tracing::instrument(skip(state), fields(payment_id = %id))]
pub async fn get_qr<R: PaymentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let image = state.service.generate_qr(&PaymentId::from(id)).await?;
    let content_type = state.service.qr_encoder().content_type();
    Ok(([(header::CONTENT_TYPE, content_type)], image))
}

/// QR code as base64 text with the payment URL.
#[tracing::instrument(skip(state), fields(payment_id = %id))]
pub async fn get_qr_code<R: PaymentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let qr = state.service.generate_qr_code(&PaymentId::from(id)).await?;
    Ok(Json(qr))
}

// ─────────────────────────────────────────────────────────────────────────────
// Notifications
// ─────────────────────────────────────────────────────────────────────────────

/// Apply a webhook-style status notification.
///
/// When a notify secret is configured the raw body must be signed with it;
/// see [`payments_types::signature`].
#[tracing::instrument(skip(state, headers, body), fields(payment_id = %id))]
pub async fn notify<R: PaymentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(secret) = &state.notify_secret {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if !verify_notification(&body, signature, secret) {
            tracing::warn!("Rejected notification with invalid signature");
            return Err(AppError::Unauthorized("Invalid notification signature".into()).into());
        }
    }

    let req: NotifyRequest = parse_optional_json(&body)?;
    state
        .service
        .handle_notify(&PaymentId::from(id), req)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─────────────────────────────────────────────────────────────────────────────
// Cancellation & Receipts
// ─────────────────────────────────────────────────────────────────────────────

/// Cancel a payment (placeholder).
#[tracing::instrument(skip(state, body), fields(payment_id = %id))]
pub async fn cancel_payment<R: PaymentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let req: CancelPaymentRequest = parse_optional_json(&body)?;
    let cancelled = state
        .service
        .cancel_payment(&PaymentId::from(id), req.reason)
        .await?;
    Ok(Json(cancelled))
}

/// Receipt for a payment (placeholder).
#[tracing::instrument(skip(state), fields(payment_id = %id))]
pub async fn get_receipt<R: PaymentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let receipt = state.service.generate_receipt(&PaymentId::from(id)).await?;
    Ok(Json(receipt))
}

// ─────────────────────────────────────────────────────────────────────────────
// Reference Data
// ─────────────────────────────────────────────────────────────────────────────

/// Supported settlement networks.
pub async fn get_networks<R: PaymentRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> impl IntoResponse {
    Json(state.service.get_networks())
}

/// Reference exchange rates.
pub async fn get_exchange_rates<R: PaymentRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> impl IntoResponse {
    Json(state.service.get_exchange_rates())
}

/// OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    use utoipa::OpenApi;
    Json(crate::openapi::ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_optional_json_empty_body() {
        let req: NotifyRequest = parse_optional_json(&Bytes::new()).unwrap();
        assert_eq!(req, NotifyRequest::default());
    }

    #[test]
    fn test_parse_optional_json_rejects_garbage() {
        let result: Result<NotifyRequest, _> = parse_optional_json(&Bytes::from_static(b"{oops"));
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_parse_optional_json_rejects_unknown_status() {
        let body = Bytes::from_static(br#"{"status":"SETTLED"}"#);
        let result: Result<NotifyRequest, _> = parse_optional_json(&body);
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
