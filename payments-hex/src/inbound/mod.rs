//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the application layer.

mod handlers;
mod rate_limit;
mod server;

pub use rate_limit::{DEFAULT_MAX_TRACKED_CLIENTS, RateLimiterState};
pub use server::{HttpServer, serve};
