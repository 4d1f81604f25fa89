//! Rate limiting middleware using Governor.
//!
//! Implements per-client rate limiting with a token bucket algorithm.
//! Clients are told apart by their peer address. The first address in
//! `X-Forwarded-For` is used instead only when the server is configured to
//! trust it (i.e. it runs behind a proxy that overwrites the header).
//! Requests with neither share the `anonymous` bucket.

use axum::{
    Json,
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde_json::json;
use std::{
    net::SocketAddr,
    num::NonZeroU32,
    sync::Arc,
    time::{Duration, Instant},
};

const ANONYMOUS_CLIENT: &str = "anonymous";

/// Tracked clients above which idle buckets are evicted.
pub const DEFAULT_MAX_TRACKED_CLIENTS: usize = 10_000;

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

struct ClientBucket {
    limiter: DirectLimiter,
    last_seen: Instant,
}

/// Rate limiter state shared across requests.
pub struct RateLimiterState {
    /// Per-client rate limiters
    limiters: DashMap<String, ClientBucket>,
    /// Quota applied to every client
    quota: Quota,
    /// Time for a spent bucket to fully refill
    period: Duration,
    max_tracked_clients: usize,
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::new(100, Duration::from_secs(60))
    }
}

impl RateLimiterState {
    /// Allows `requests` per `period` for each client, all of which may be
    /// spent in one burst. A zero request count is treated as one.
    pub fn new(requests: u32, period: Duration) -> Self {
        let burst = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        let replenish = period / burst.get();
        let quota = Quota::with_period(replenish)
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        Self {
            limiters: DashMap::new(),
            quota,
            period,
            max_tracked_clients: DEFAULT_MAX_TRACKED_CLIENTS,
        }
    }

    /// Overrides the number of clients tracked before idle ones are evicted.
    pub fn with_max_tracked_clients(mut self, max: usize) -> Self {
        self.max_tracked_clients = max.max(1);
        self
    }

    /// Checks if a request should be rate limited.
    /// Returns true if the request is allowed, false if rate limited.
    pub fn check(&self, client: &str) -> bool {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> bool {
        if self.limiters.len() >= self.max_tracked_clients && !self.limiters.contains_key(client)
        {
            self.evict_idle(now);
        }

        let mut bucket = self
            .limiters
            .entry(client.to_string())
            .or_insert_with(|| ClientBucket {
                limiter: RateLimiter::direct(self.quota),
                last_seen: now,
            });
        bucket.last_seen = now;
        bucket.limiter.check().is_ok()
    }

    /// Drops buckets untouched for a full period. Such a bucket has refilled
    /// completely, so forgetting it changes no client's allowance.
    pub fn evict_idle(&self, now: Instant) {
        let before = self.limiters.len();
        self.limiters
            .retain(|_, bucket| now.saturating_duration_since(bucket.last_seen) < self.period);
        tracing::debug!(
            evicted = before - self.limiters.len(),
            "Evicted idle rate limit buckets"
        );
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiters.len()
    }

    /// Seconds until a spent bucket has fully refilled.
    pub fn retry_after_secs(&self) -> u64 {
        self.period.as_secs().max(1)
    }
}

/// Middleware state: the shared limiter plus how clients are identified.
#[derive(Clone)]
pub struct RateLimitContext {
    pub limiter: Arc<RateLimiterState>,
    pub trust_forwarded_for: bool,
}

/// Derives the bucket key for a request.
fn client_key(request: &Request<Body>, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = request
            .headers()
            .get("X-Forwarded-For")
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| ANONYMOUS_CLIENT.to_string())
}

/// Rate limiting middleware. `/health` is never limited.
pub async fn rate_limit_middleware(
    State(ctx): State<RateLimitContext>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let client = client_key(&request, ctx.trust_forwarded_for);

    if !ctx.limiter.check(&client) {
        tracing::warn!(client = %client, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Rate limit exceeded. Please try again later.",
                "code": 429,
                "retry_after_seconds": ctx.limiter.retry_after_secs()
            })),
        )
            .into_response();
    }

    next.run(request).await
}
