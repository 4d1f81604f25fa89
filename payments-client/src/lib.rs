//! # Payments Client SDK
//!
//! A typed Rust client for the payment record API.

use std::collections::BTreeMap;

use payments_types::{
    CancelPaymentRequest, CancellationResponse, CreatePaymentRequest, NotifyRequest, Payment,
    PaymentFilters, PaymentPage, PaymentStatus, PaymentStatusResponse, QrCodeResponse,
    ReceiptResponse,
    signature::{SIGNATURE_HEADER, sign_notification},
};
use reqwest::{Client, Url, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

/// Payments API client.
pub struct PaymentsClient {
    base_url: String,
    notify_secret: Option<String>,
    http: Client,
}

impl PaymentsClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            notify_secret: None,
            http: Client::new(),
        }
    }

    /// Signs notifications sent by [`Self::notify`] with `secret`.
    pub fn with_notify_secret(mut self, secret: impl Into<String>) -> Self {
        self.notify_secret = Some(secret.into());
        self
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(self.url(&["health"])?)
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Submits a payment draft. The server echoes it back with an `id`.
    pub async fn create_payment(
        &self,
        draft: &CreatePaymentRequest,
    ) -> Result<CreatePaymentRequest, ClientError> {
        self.post(&["api", "payments"], draft).await
    }

    /// Lists payments matching `filters`.
    pub async fn list_payments(&self, filters: &PaymentFilters) -> Result<PaymentPage, ClientError> {
        let resp = self
            .http
            .get(self.url(&["api", "payments"])?)
            .query(filters)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// Gets a payment by ID.
    pub async fn get_payment(&self, id: &str) -> Result<Payment, ClientError> {
        self.get(&["api", "payments", id]).await
    }

    /// Gets full payment details.
    pub async fn get_payment_details(&self, id: &str) -> Result<Payment, ClientError> {
        self.get(&["api", "payments", id, "details"]).await
    }

    /// Gets the current status of a payment.
    pub async fn get_payment_status(&self, id: &str) -> Result<PaymentStatus, ClientError> {
        let resp: PaymentStatusResponse = self.get(&["api", "payments", id, "status"]).await?;
        Ok(resp.status)
    }

    /// Gets a payment by external reference.
    pub async fn get_payment_by_reference(&self, reference: &str) -> Result<Payment, ClientError> {
        self.get(&["api", "payments", "reference", reference])
            .await
    }

    /// Downloads the QR code image (PNG) of a payment.
    pub async fn get_qr(&self, id: &str) -> Result<Vec<u8>, ClientError> {
        let resp = self
            .http
            .get(self.url(&["api", "payments", id, "qr"])?)
            .send()
            .await?;
        let resp = Self::check_status(resp).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    /// Gets the QR code of a payment as base64 text with its payment URL.
    pub async fn get_qr_code(&self, id: &str) -> Result<QrCodeResponse, ClientError> {
        self.get(&["api", "payments", id, "qr-code"]).await
    }

    /// Sends a status notification, signed when a notify secret is set.
    pub async fn notify(&self, id: &str, req: &NotifyRequest) -> Result<(), ClientError> {
        let body = serde_json::to_vec(req)?;
        let mut builder = self
            .http
            .post(self.url(&["api", "payments", id, "notify"])?)
            .header(CONTENT_TYPE, "application/json");
        if let Some(secret) = &self.notify_secret {
            builder = builder.header(SIGNATURE_HEADER, sign_notification(&body, secret));
        }
        let resp = builder.body(body).send().await?;
        Self::check_status(resp).await?;
        Ok(())
    }

    /// Cancels a payment.
    pub async fn cancel_payment(
        &self,
        id: &str,
        reason: Option<String>,
    ) -> Result<CancellationResponse, ClientError> {
        let req = CancelPaymentRequest { reason };
        self.post(&["api", "payments", id, "cancel"], &req)
            .await
    }

    /// Gets the receipt of a payment.
    pub async fn get_receipt(&self, id: &str) -> Result<ReceiptResponse, ClientError> {
        self.get(&["api", "payments", id, "receipt"]).await
    }

    /// Lists supported settlement networks.
    pub async fn get_networks(&self) -> Result<Vec<String>, ClientError> {
        self.get(&["api", "payments", "networks"]).await
    }

    /// Gets reference exchange rates, keyed like `ETH/USD`.
    pub async fn get_exchange_rates(&self) -> Result<BTreeMap<String, f64>, ClientError> {
        self.get(&["api", "payments", "exchange-rates"]).await
    }

    /// Joins `segments` onto the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let invalid = || ClientError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(self.url(segments)?)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .post(self.url(segments)?)
            .json(body)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Turns non-2xx responses into [`ClientError::Api`].
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            message: error_message(body),
        })
    }
}

/// Extracts the `error` field of an API error body, or returns it whole.
fn error_message(body: String) -> String {
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or(body)
}
