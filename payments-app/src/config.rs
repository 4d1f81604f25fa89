//! Configuration loading from environment.

use std::env;

use payments_hex::DEFAULT_PAYMENT_BASE_URL;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 100;

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// Base of the links encoded in QR codes
    pub payment_base_url: String,
    /// Shared secret for signed notifications; unsigned notifications are
    /// accepted when unset
    pub notify_secret: Option<String>,
    pub rate_limit_per_minute: u32,
    /// Rate-limit by `X-Forwarded-For`; only behind a rewriting proxy
    pub trust_forwarded_for: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = match lookup("PORT") {
            Some(port) => port.parse()?,
            None => DEFAULT_PORT,
        };

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let payment_base_url = lookup("PAYMENT_BASE_URL")
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_PAYMENT_BASE_URL.to_string());

        let notify_secret = lookup("NOTIFY_WEBHOOK_SECRET").filter(|s| !s.is_empty());

        let rate_limit_per_minute = match lookup("RATE_LIMIT_PER_MINUTE") {
            Some(limit) => limit.parse()?,
            None => DEFAULT_RATE_LIMIT_PER_MINUTE,
        };

        let trust_forwarded_for = match lookup("TRUST_FORWARDED_FOR") {
            Some(flag) => flag.parse()?,
            None => false,
        };

        Ok(Self {
            port,
            database_url,
            payment_base_url,
            notify_secret,
            rate_limit_per_minute,
            trust_forwarded_for,
        })
    }
}
