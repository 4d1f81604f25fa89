//! Shared database types with feature-gated fields for SQLite and PostgreSQL.

use sqlx::FromRow;

use payments_types::{Network, Payment, PaymentId, PaymentStatus, RepoError};

#[cfg(not(feature = "sqlite"))]
use chrono::{DateTime, Utc};

/// Payment row from database.
#[derive(FromRow)]
pub struct DbPayment {
    pub id: String,
    pub status: String,
    pub amount: i64,
    pub currency: Option<String>,
    pub network: Option<String>,
    pub description: Option<String>,

    #[cfg(not(feature = "sqlite"))]
    pub created_at: DateTime<Utc>,
    #[cfg(feature = "sqlite")]
    pub created_at: String,

    #[cfg(not(feature = "sqlite"))]
    pub updated_at: DateTime<Utc>,
    #[cfg(feature = "sqlite")]
    pub updated_at: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

pub fn parse_status(s: &str) -> Result<PaymentStatus, RepoError> {
    s.parse().map_err(RepoError::Database)
}

pub fn parse_network(s: Option<String>) -> Result<Option<Network>, RepoError> {
    s.map(|n| n.parse::<Network>())
        .transpose()
        .map_err(|e| RepoError::Database(e.to_string()))
}

#[cfg(feature = "sqlite")]
pub fn parse_timestamp(s: &str) -> Result<chrono::DateTime<chrono::Utc>, RepoError> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| RepoError::Database(e.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Domain conversion (feature-gated implementations)
// ─────────────────────────────────────────────────────────────────────────────

impl DbPayment {
    /// Convert database row to domain Payment.
    pub fn into_domain(self) -> Result<Payment, RepoError> {
        let status = parse_status(&self.status)?;
        let network = parse_network(self.network)?;

        #[cfg(not(feature = "sqlite"))]
        let (created_at, updated_at) = (self.created_at, self.updated_at);

        #[cfg(feature = "sqlite")]
        let (created_at, updated_at) = (
            parse_timestamp(&self.created_at)?,
            parse_timestamp(&self.updated_at)?,
        );

        Ok(Payment::from_parts(
            PaymentId::from(self.id),
            status,
            self.amount,
            self.currency,
            network,
            self.description,
            created_at,
            updated_at,
        ))
    }
}
