//! Configuration management for the PayRelay server
//!
//! All runtime configuration comes from environment variables, validated at
//! startup. Required credentials fail fast with a clear error before the
//! server binds; optional values fall back to sensible defaults. There is
//! no global mutable state; the config is constructed once in `main` and
//! passed into the endpoint state.

use anyhow::{bail, Context, Result};
use std::env;

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Default exchange-rate collaborator endpoint
pub const DEFAULT_RATE_URL: &str = "https://api.exchangerate-api.com/v4/latest/NGN";

/// Default moderator contact link shown to the buyer
pub const DEFAULT_MODERATOR_CONTACT: &str = "https://wa.me/2349114301708";

/// Default bound on the exchange-rate lookup, in seconds
pub const DEFAULT_RATE_TIMEOUT_SECS: u64 = 5;

/// Default bound on each Telegram API call, in seconds
pub const DEFAULT_TELEGRAM_TIMEOUT_SECS: u64 = 15;

/// Centralized configuration for the PayRelay server
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Telegram bot token used for all outbound deliveries (required)
    pub telegram_token: String,

    /// Administrator chat id, the always-attempted recipient (required)
    pub admin_chat_id: i64,

    /// Listen port
    pub port: u16,

    /// Exchange-rate collaborator endpoint
    pub rate_endpoint: String,

    /// Bound on the exchange-rate lookup, in seconds
    pub rate_timeout_secs: u64,

    /// Bound on each Telegram API call, in seconds
    pub telegram_timeout_secs: u64,

    /// Moderator contact link included in the buyer confirmation
    pub moderator_contact: String,
}

impl RelayConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// Fails when `TELEGRAM_TOKEN` is absent or `ADMIN_ID` is absent or
    /// non-numeric; the process must not start without working credentials.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let Some(telegram_token) = get("TELEGRAM_TOKEN").filter(|t| !t.trim().is_empty()) else {
            bail!("Missing TELEGRAM_TOKEN");
        };

        let admin_chat_id = get("ADMIN_ID")
            .filter(|v| !v.trim().is_empty())
            .context("Missing ADMIN_ID")?
            .trim()
            .parse::<i64>()
            .context("ADMIN_ID must be a numeric chat id")?;

        Ok(Self {
            telegram_token,
            admin_chat_id,
            port: get("PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            rate_endpoint: get("RATE_URL").unwrap_or_else(|| DEFAULT_RATE_URL.to_string()),
            rate_timeout_secs: get("RATE_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_RATE_TIMEOUT_SECS),
            telegram_timeout_secs: get("TELEGRAM_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_TELEGRAM_TIMEOUT_SECS),
            moderator_contact: get("MODERATOR_CONTACT")
                .unwrap_or_else(|| DEFAULT_MODERATOR_CONTACT.to_string()),
        })
    }
}
