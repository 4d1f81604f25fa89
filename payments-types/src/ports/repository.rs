//! Repository port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (Postgres, SQLite) implement this trait.

use crate::domain::{Payment, PaymentId};
use crate::error::RepoError;

/// Persistence port for payment records.
///
/// Writes are plain overwrites: there is no optimistic locking, so two
/// concurrent saves of the same payment resolve as last-write-wins.
#[async_trait::async_trait]
pub trait PaymentRepository: Send + Sync + 'static {
    /// Finds a payment by ID.
    async fn find_payment(&self, id: &PaymentId) -> Result<Option<Payment>, RepoError>;

    /// Inserts the payment, or replaces the stored record with the same ID.
    async fn save_payment(&self, payment: &Payment) -> Result<(), RepoError>;
}
