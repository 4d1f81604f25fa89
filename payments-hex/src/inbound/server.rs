//! HTTP Server configuration and startup.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use payments_types::PaymentRepository;

use super::handlers::{self, AppState};
use super::rate_limit::{RateLimitContext, RateLimiterState, rate_limit_middleware};
use crate::PaymentService;

/// HTTP Server for the Payments API.
///
/// Settings are plain fields; shared state is assembled in [`Self::router`],
/// so builder calls made after a router was built apply to the next one.
pub struct HttpServer<R: PaymentRepository> {
    service: Arc<PaymentService<R>>,
    notify_secret: Option<String>,
    rate_limiter: Arc<RateLimiterState>,
    trust_forwarded_for: bool,
}

impl<R: PaymentRepository> HttpServer<R> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: PaymentService<R>) -> Self {
        Self {
            service: Arc::new(service),
            notify_secret: None,
            rate_limiter: Arc::new(RateLimiterState::default()), // 100 req/min default
            trust_forwarded_for: false,
        }
    }

    /// Creates a new HTTP server with custom rate limiting.
    pub fn with_rate_limit(service: PaymentService<R>, requests_per_minute: u32) -> Self {
        Self {
            rate_limiter: Arc::new(RateLimiterState::new(
                requests_per_minute,
                Duration::from_secs(60),
            )),
            ..Self::new(service)
        }
    }

    /// Requires notifications to be signed with `secret`.
    pub fn with_notify_secret(mut self, secret: impl Into<String>) -> Self {
        self.notify_secret = Some(secret.into());
        self
    }

    /// Rate-limits by `X-Forwarded-For` instead of the peer address.
    ///
    /// Only safe behind a proxy that overwrites the header.
    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // HTTP metrics go to the globally set MeterProvider
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        Router::new()
            .route("/health", get(handlers::health))
            .route("/api-docs/openapi.json", get(handlers::openapi_json))
            .route(
                "/api/payments",
                post(handlers::create_payment::<R>).get(handlers::list_payments::<R>),
            )
            .route("/api/payments/networks", get(handlers::get_networks::<R>))
            .route(
                "/api/payments/exchange-rates",
                get(handlers::get_exchange_rates::<R>),
            )
            .route(
                "/api/payments/reference/{reference}",
                get(handlers::get_payment_by_reference::<R>),
            )
            .route("/api/payments/{id}", get(handlers::get_payment::<R>))
            .route(
                "/api/payments/{id}/details",
                get(handlers::get_payment_details::<R>),
            )
            .route(
                "/api/payments/{id}/status",
                get(handlers::get_payment_status::<R>),
            )
            .route("/api/payments/{id}/qr", get(handlers::get_qr::<R>))
            .route("/api/payments/{id}/qr-code", get(handlers::get_qr_code::<R>))
            .route("/api/payments/{id}/notify", post(handlers::notify::<R>))
            .route(
                "/api/payments/{id}/cancel",
                post(handlers::cancel_payment::<R>),
            )
            .route("/api/payments/{id}/receipt", get(handlers::get_receipt::<R>))
            .layer(metrics)
            .layer(middleware::from_fn_with_state(
                RateLimitContext {
                    limiter: self.rate_limiter.clone(),
                    trust_forwarded_for: self.trust_forwarded_for,
                },
                rate_limit_middleware,
            ))
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::new(AppState {
                service: self.service.clone(),
                notify_secret: self.notify_secret.clone(),
            }))
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        serve(self.router(), addr).await
    }
}

/// Serves a router until Ctrl+C or SIGTERM.
pub async fn serve(router: Router, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    // Peer addresses feed the rate limiter
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
