//! PaymentService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use base64::{Engine, engine::general_purpose::STANDARD as B64};
    use serde_json::json;

    use payments_types::{
        AppError, CreatePaymentRequest, NotifyRequest, Payment, PaymentFilters, PaymentId,
        PaymentMetrics, PaymentPage, PaymentRepository, PaymentStatus, QrEncoder, QrError,
        RepoError,
    };

    use crate::PaymentService;

    /// Simple in-memory repository for testing the service layer.
    pub struct MockRepo {
        payments: Mutex<HashMap<PaymentId, Payment>>,
        saves: Mutex<usize>,
    }

    impl MockRepo {
        pub fn new() -> Self {
            Self {
                payments: Mutex::new(HashMap::new()),
                saves: Mutex::new(0),
            }
        }

        pub fn with_payment(self, payment: Payment) -> Self {
            self.payments
                .lock()
                .unwrap()
                .insert(payment.id.clone(), payment);
            self
        }

        fn save_count(&self) -> usize {
            *self.saves.lock().unwrap()
        }
    }

    #[async_trait]
    impl PaymentRepository for MockRepo {
        async fn find_payment(&self, id: &PaymentId) -> Result<Option<Payment>, RepoError> {
            Ok(self.payments.lock().unwrap().get(id).cloned())
        }

        async fn save_payment(&self, payment: &Payment) -> Result<(), RepoError> {
            *self.saves.lock().unwrap() += 1;
            self.payments
                .lock()
                .unwrap()
                .insert(payment.id.clone(), payment.clone());
            Ok(())
        }
    }

    /// Repository whose every call fails, standing in for a lost connection.
    struct BrokenRepo;

    #[async_trait]
    impl PaymentRepository for BrokenRepo {
        async fn find_payment(&self, _id: &PaymentId) -> Result<Option<Payment>, RepoError> {
            Err(RepoError::Database("connection refused".into()))
        }

        async fn save_payment(&self, _payment: &Payment) -> Result<(), RepoError> {
            Err(RepoError::Database("connection refused".into()))
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum MetricEvent {
        Processed { currency: String },
        Failed { currency: String, reason: String },
    }

    /// Metrics sink that remembers every increment.
    #[derive(Default)]
    pub struct RecordingMetrics {
        events: Mutex<Vec<MetricEvent>>,
    }

    impl RecordingMetrics {
        pub fn events(&self) -> Vec<MetricEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl PaymentMetrics for RecordingMetrics {
        fn increment_processed(&self, currency: &str) {
            self.events.lock().unwrap().push(MetricEvent::Processed {
                currency: currency.to_string(),
            });
        }

        fn increment_failed(&self, currency: &str, reason: &str) {
            self.events.lock().unwrap().push(MetricEvent::Failed {
                currency: currency.to_string(),
                reason: reason.to_string(),
            });
        }
    }

    /// QR encoder returning the encoded text itself, so tests can see it.
    pub struct EchoQr;

    impl QrEncoder for EchoQr {
        fn encode(&self, text: &str) -> Result<Vec<u8>, QrError> {
            Ok(format!("QR:{}", text).into_bytes())
        }
    }

    struct FailingQr;

    impl QrEncoder for FailingQr {
        fn encode(&self, _text: &str) -> Result<Vec<u8>, QrError> {
            Err(QrError::Encode("data too long".into()))
        }
    }

    fn payment(id: &str, currency: Option<&str>) -> Payment {
        Payment::new(PaymentId::from(id), 2500, currency.map(String::from), None)
    }

    fn service_with(repo: MockRepo) -> (PaymentService<MockRepo>, Arc<RecordingMetrics>) {
        let metrics = Arc::new(RecordingMetrics::default());
        let service = PaymentService::new(repo, metrics.clone(), Arc::new(EchoQr));
        (service, metrics)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lookups
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_get_payment_details_success() {
        let (service, _) = service_with(MockRepo::new().with_payment(payment("p-1", None)));

        let found = service
            .get_payment_details(&PaymentId::from("p-1"))
            .await
            .unwrap();

        assert_eq!(found.id, PaymentId::from("p-1"));
        assert_eq!(found.amount, 2500);
    }

    #[tokio::test]
    async fn test_lookups_on_missing_payment_fail_not_found() {
        let (service, _) = service_with(MockRepo::new());
        let id = PaymentId::from("missing");

        assert!(matches!(
            service.get_payment_details(&id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.get_payment_status(&id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.generate_qr(&id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.generate_qr_code(&id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.get_payment_by_id(&id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.get_payment_by_reference("missing").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_payment_status_projects_status() {
        let mut p = payment("p-1", None);
        p.status = PaymentStatus::Processing;
        let (service, _) = service_with(MockRepo::new().with_payment(p));

        let status = service
            .get_payment_status(&PaymentId::from("p-1"))
            .await
            .unwrap();

        assert_eq!(status.status, PaymentStatus::Processing);
    }

    #[tokio::test]
    async fn test_get_payment_by_reference_matches_id() {
        let (service, _) = service_with(MockRepo::new().with_payment(payment("ref-7", None)));

        let found = service.get_payment_by_reference("ref-7").await.unwrap();

        assert_eq!(found.id.as_str(), "ref-7");
    }

    #[tokio::test]
    async fn test_store_failure_is_internal() {
        let service = PaymentService::new(
            BrokenRepo,
            Arc::new(RecordingMetrics::default()),
            Arc::new(EchoQr),
        );

        let result = service.get_payment_details(&PaymentId::from("p-1")).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // QR Codes
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_generate_qr_encodes_payment_url() {
        let (service, _) = service_with(MockRepo::new().with_payment(payment("p-1", None)));

        let image = service.generate_qr(&PaymentId::from("p-1")).await.unwrap();

        assert_eq!(image, b"QR:https://example.com/payment/p-1".to_vec());
    }

    #[tokio::test]
    async fn test_generate_qr_code_is_base64_of_generate_qr() {
        let (service, _) = service_with(MockRepo::new().with_payment(payment("p-1", None)));
        let id = PaymentId::from("p-1");

        let image = service.generate_qr(&id).await.unwrap();
        let qr = service.generate_qr_code(&id).await.unwrap();

        assert_eq!(qr.qr_code_data, B64.encode(image));
        assert_eq!(qr.payment_url, "https://example.com/payment/p-1");
    }

    #[tokio::test]
    async fn test_custom_base_url() {
        let (service, _) = service_with(MockRepo::new().with_payment(payment("p-1", None)));
        let service = service.with_base_url("https://pay.acme.test/");

        let qr = service
            .generate_qr_code(&PaymentId::from("p-1"))
            .await
            .unwrap();

        assert_eq!(qr.payment_url, "https://pay.acme.test/payment/p-1");
    }

    #[tokio::test]
    async fn test_encoder_failure_is_internal() {
        let service = PaymentService::new(
            MockRepo::new().with_payment(payment("p-1", None)),
            Arc::new(RecordingMetrics::default()),
            Arc::new(FailingQr),
        );

        let result = service.generate_qr(&PaymentId::from("p-1")).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Notifications
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_notify_completed_without_currency_counts_usd() {
        let (service, metrics) = service_with(MockRepo::new().with_payment(payment("p-1", None)));
        let id = PaymentId::from("p-1");

        service
            .handle_notify(&id, NotifyRequest::with_status(PaymentStatus::Completed))
            .await
            .unwrap();

        assert_eq!(
            metrics.events(),
            vec![MetricEvent::Processed {
                currency: "USD".into()
            }]
        );
        let stored = service.get_payment_details(&id).await.unwrap();
        assert_eq!(stored.status, PaymentStatus::Completed);
    }

    #[tokio::test]
    async fn test_notify_failed_tags_currency_and_reason() {
        let (service, metrics) =
            service_with(MockRepo::new().with_payment(payment("p-1", Some("EUR"))));

        service
            .handle_notify(
                &PaymentId::from("p-1"),
                NotifyRequest {
                    status: Some(PaymentStatus::Failed),
                    reason: Some("timeout".into()),
                },
            )
            .await
            .unwrap();

        assert_eq!(
            metrics.events(),
            vec![MetricEvent::Failed {
                currency: "EUR".into(),
                reason: "timeout".into()
            }]
        );
    }

    #[tokio::test]
    async fn test_notify_failed_without_reason_tags_unknown() {
        let (service, metrics) =
            service_with(MockRepo::new().with_payment(payment("p-1", Some("EUR"))));

        service
            .handle_notify(
                &PaymentId::from("p-1"),
                NotifyRequest::with_status(PaymentStatus::Failed),
            )
            .await
            .unwrap();

        assert_eq!(
            metrics.events(),
            vec![MetricEvent::Failed {
                currency: "EUR".into(),
                reason: "unknown".into()
            }]
        );
    }

    #[tokio::test]
    async fn test_notify_other_status_persists_without_metrics() {
        let repo = MockRepo::new().with_payment(payment("p-1", None));
        let (service, metrics) = service_with(repo);
        let id = PaymentId::from("p-1");

        service
            .handle_notify(&id, NotifyRequest::with_status(PaymentStatus::Processing))
            .await
            .unwrap();

        assert!(metrics.events().is_empty());
        assert_eq!(service.repo().save_count(), 1);
        let stored = service.get_payment_details(&id).await.unwrap();
        assert_eq!(stored.status, PaymentStatus::Processing);
    }

    #[tokio::test]
    async fn test_notify_without_status_is_a_no_op() {
        let (service, metrics) = service_with(MockRepo::new().with_payment(payment("p-1", None)));

        service
            .handle_notify(&PaymentId::from("p-1"), NotifyRequest::default())
            .await
            .unwrap();

        assert!(metrics.events().is_empty());
        assert_eq!(service.repo().save_count(), 0);
    }

    #[tokio::test]
    async fn test_notify_missing_payment_fails_not_found() {
        let (service, metrics) = service_with(MockRepo::new());

        let result = service
            .handle_notify(
                &PaymentId::from("missing"),
                NotifyRequest::with_status(PaymentStatus::Completed),
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(metrics.events().is_empty());
    }

    #[tokio::test]
    async fn test_notify_allows_any_transition_and_repeats() {
        let mut p = payment("p-1", None);
        p.status = PaymentStatus::Completed;
        let (service, metrics) = service_with(MockRepo::new().with_payment(p));
        let id = PaymentId::from("p-1");

        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Completed,
            PaymentStatus::Completed,
        ] {
            service
                .handle_notify(&id, NotifyRequest::with_status(status))
                .await
                .unwrap();
        }

        assert_eq!(metrics.events().len(), 2);
        assert_eq!(service.repo().save_count(), 3);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Static Tables & Placeholders
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_networks_and_rates_are_fixed() {
        let (service, _) = service_with(MockRepo::new());

        assert_eq!(service.get_networks(), vec!["ethereum", "polygon", "bsc"]);

        let rates = service.get_exchange_rates();
        assert_eq!(
            serde_json::to_value(&rates).unwrap(),
            json!({ "ETH/USD": 3000, "MATIC/USD": 1.5, "BNB/USD": 400 })
        );
    }

    #[tokio::test]
    async fn test_whole_rates_serialize_as_integers() {
        let (service, _) = service_with(MockRepo::new());

        let body = serde_json::to_string(&service.get_exchange_rates()).unwrap();

        assert!(body.contains(r#""ETH/USD":3000"#), "{}", body);
        assert!(!body.contains("3000.0"), "{}", body);
        assert!(body.contains(r#""MATIC/USD":1.5"#), "{}", body);
    }

    #[tokio::test]
    async fn test_create_payment_echoes_draft_with_stub_id() {
        let (service, _) = service_with(MockRepo::new());
        let draft: CreatePaymentRequest = serde_json::from_value(json!({
            "amount": 2500,
            "currency": "USD"
        }))
        .unwrap();

        let created = service.create_payment(draft).await.unwrap();

        assert_eq!(
            serde_json::Value::Object(created),
            json!({ "id": "stub", "amount": 2500, "currency": "USD" })
        );
        assert_eq!(service.repo().save_count(), 0);
    }

    #[tokio::test]
    async fn test_create_payment_draft_id_wins() {
        let (service, _) = service_with(MockRepo::new());
        let draft: CreatePaymentRequest =
            serde_json::from_value(json!({ "id": "mine" })).unwrap();

        let created = service.create_payment(draft).await.unwrap();

        assert_eq!(created["id"], "mine");
    }

    #[tokio::test]
    async fn test_get_payments_ignores_filters() {
        let (service, _) = service_with(MockRepo::new().with_payment(payment("p-1", None)));

        let page = service
            .get_payments(PaymentFilters {
                status: Some(PaymentStatus::Pending),
                currency: None,
                page: Some(3),
                limit: Some(50),
            })
            .await
            .unwrap();

        assert_eq!(page, PaymentPage::empty());
        assert_eq!((page.total, page.page, page.limit), (0, 1, 10));
    }

    #[tokio::test]
    async fn test_cancel_payment_does_not_touch_store() {
        let (service, _) = service_with(MockRepo::new().with_payment(payment("p-1", None)));
        let id = PaymentId::from("p-1");

        let cancelled = service
            .cancel_payment(&id, Some("customer request".into()))
            .await
            .unwrap();

        assert_eq!(cancelled.status, PaymentStatus::Failed);
        assert_eq!(
            cancelled.cancellation_reason.as_deref(),
            Some("customer request")
        );
        let stored = service.get_payment_details(&id).await.unwrap();
        assert_eq!(stored.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_generate_receipt_placeholder() {
        let (service, _) = service_with(MockRepo::new());

        let receipt = service
            .generate_receipt(&PaymentId::from("anything"))
            .await
            .unwrap();

        assert_eq!(receipt.id.as_str(), "anything");
        assert_eq!(receipt.content, "Receipt stub");
    }
}
