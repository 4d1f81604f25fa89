//! SQLite repository integration tests.

#[cfg(test)]
mod tests {
    use payments_types::{Network, Payment, PaymentId, PaymentRepository, PaymentStatus};

    use crate::SqliteRepo;

    async fn setup_repo() -> SqliteRepo {
        SqliteRepo::new("sqlite::memory:").await.unwrap()
    }

    fn sample_payment() -> Payment {
        let mut payment = Payment::new(
            PaymentId::generate(),
            2500,
            Some("EUR".to_string()),
            Some(Network::Polygon),
        );
        payment.description = Some("Order #42".to_string());
        payment
    }

    #[tokio::test]
    async fn test_save_and_find_payment() {
        let repo = setup_repo().await;
        let payment = sample_payment();

        repo.save_payment(&payment).await.unwrap();
        let fetched = repo.find_payment(&payment.id).await.unwrap().unwrap();

        assert_eq!(fetched.id, payment.id);
        assert_eq!(fetched.status, PaymentStatus::Pending);
        assert_eq!(fetched.amount, 2500);
        assert_eq!(fetched.currency.as_deref(), Some("EUR"));
        assert_eq!(fetched.network, Some(Network::Polygon));
        assert_eq!(fetched.description.as_deref(), Some("Order #42"));
        assert_eq!(fetched.created_at, payment.created_at);
    }

    #[tokio::test]
    async fn test_find_payment_not_found() {
        let repo = setup_repo().await;

        let result = repo.find_payment(&PaymentId::from("missing")).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_record() {
        let repo = setup_repo().await;
        let mut payment = sample_payment();
        repo.save_payment(&payment).await.unwrap();

        payment.set_status(PaymentStatus::Completed);
        repo.save_payment(&payment).await.unwrap();

        let fetched = repo.find_payment(&payment.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, PaymentStatus::Completed);
        assert_eq!(fetched.updated_at, payment.updated_at);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let repo = setup_repo().await;
        let payment = sample_payment();
        repo.save_payment(&payment).await.unwrap();

        let mut first = payment.clone();
        first.set_status(PaymentStatus::Completed);
        let mut second = payment.clone();
        second.set_status(PaymentStatus::Failed);

        repo.save_payment(&first).await.unwrap();
        repo.save_payment(&second).await.unwrap();

        let fetched = repo.find_payment(&payment.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, PaymentStatus::Failed);
    }

    #[tokio::test]
    async fn test_payment_without_currency_or_network() {
        let repo = setup_repo().await;
        let payment = Payment::new(PaymentId::from("bare"), 100, None, None);

        repo.save_payment(&payment).await.unwrap();
        let fetched = repo.find_payment(&payment.id).await.unwrap().unwrap();

        assert!(fetched.currency.is_none());
        assert!(fetched.network.is_none());
        assert_eq!(fetched.currency_or_default(), "USD");
    }

    #[tokio::test]
    async fn test_corrupt_status_is_a_database_error() {
        let repo = setup_repo().await;
        sqlx::query(
            r#"INSERT INTO payments (id, status, amount, created_at, updated_at)
               VALUES ('bad', 'SETTLED', 0, '2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00')"#,
        )
        .execute(repo.pool())
        .await
        .unwrap();

        let result = repo.find_payment(&PaymentId::from("bad")).await;

        assert!(matches!(
            result,
            Err(payments_types::RepoError::Database(_))
        ));
    }
}
