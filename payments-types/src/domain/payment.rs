//! Payment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Network;

/// Currency reported for payments that were stored without one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Opaque identifier for a Payment.
///
/// Identifiers are assigned by whoever creates the record and are never
/// interpreted by the service, so any non-empty string is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "3f2b8c1e-6a4d-4f7b-9e2a-1c5d8b7a9f01")]
pub struct PaymentId(String);

impl PaymentId {
    /// Creates a fresh random identifier (UUID v4 text).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PaymentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PaymentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of a payment.
///
/// There is no transition table: an inbound notification may move a payment
/// from any status to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
    Expired,
}

impl AsRef<str> for PaymentStatus {
    fn as_ref(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Expired => "EXPIRED",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "PROCESSING" => Ok(Self::Processing),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            "EXPIRED" => Ok(Self::Expired),
            _ => Err(format!("Unknown payment status: {}", s)),
        }
    }
}

/// A persisted payment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,
    /// Current status
    pub status: PaymentStatus,
    /// Amount in the smallest unit of `currency`
    #[schema(example = 2500)]
    pub amount: i64,
    /// Currency code; `None` is reported as USD
    #[schema(example = "USD")]
    pub currency: Option<String>,
    /// Settlement network, if chosen
    pub network: Option<Network>,
    /// Free-form description
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a new pending payment.
    pub fn new(
        id: PaymentId,
        amount: i64,
        currency: Option<String>,
        network: Option<Network>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: PaymentStatus::Pending,
            amount,
            currency,
            network,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstructs a payment from database fields.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: PaymentId,
        status: PaymentStatus,
        amount: i64,
        currency: Option<String>,
        network: Option<Network>,
        description: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            status,
            amount,
            currency,
            network,
            description,
            created_at,
            updated_at,
        }
    }

    /// Currency used for reporting, falling back to USD.
    pub fn currency_or_default(&self) -> &str {
        self.currency
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CURRENCY)
    }

    /// Overwrites the status and bumps `updated_at`.
    pub fn set_status(&mut self, status: PaymentStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_payment_is_pending() {
        let payment = Payment::new(PaymentId::from("p-1"), 1000, None, None);

        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.created_at, payment.updated_at);
    }

    #[test]
    fn test_currency_defaults_to_usd() {
        let mut payment = Payment::new(PaymentId::from("p-1"), 1000, None, None);
        assert_eq!(payment.currency_or_default(), "USD");

        payment.currency = Some(String::new());
        assert_eq!(payment.currency_or_default(), "USD");

        payment.currency = Some("EUR".to_string());
        assert_eq!(payment.currency_or_default(), "EUR");
    }

    #[test]
    fn test_any_status_overwrites_any_other() {
        let mut payment = Payment::new(PaymentId::from("p-1"), 1000, None, None);

        payment.set_status(PaymentStatus::Completed);
        payment.set_status(PaymentStatus::Pending);

        assert_eq!(payment.status, PaymentStatus::Pending);
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&PaymentStatus::Completed).unwrap();
        assert_eq!(json, "\"COMPLETED\"");
        assert_eq!("failed".parse::<PaymentStatus>(), Ok(PaymentStatus::Failed));
        assert!("settled".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_payment_serializes_camel_case() {
        let payment = Payment::new(
            PaymentId::from("p-1"),
            1000,
            Some("USD".into()),
            Some(Network::Polygon),
        );
        let json = serde_json::to_value(&payment).unwrap();

        assert_eq!(json["id"], "p-1");
        assert_eq!(json["network"], "polygon");
        assert!(json.get("createdAt").is_some());
    }
}
