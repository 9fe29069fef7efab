//! Pricing resolution and currency conversion
//!
//! This module derives the display pricing for one submission:
//!
//! - Look up the plan's naira price and referral payout in the static table
//! - Convert both to USD with a live NGN→USD exchange rate
//! - Round to two decimals, half away from zero
//!
//! The exchange rate is fetched fresh for every submission and never cached.
//! The lookup is attempted exactly once with a bounded timeout; every
//! failure mode (network, timeout, non-2xx status, malformed body, missing
//! `rates.USD`, non-positive value) degrades to [`FALLBACK_USD_RATE`] and
//! never aborts the submission.

use crate::error::{RelayError, Result};
use crate::plan::PlanCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Fixed NGN→USD conversion factor used when the live lookup is unavailable.
pub const FALLBACK_USD_RATE: f64 = 0.0025;

/// Round to two decimal places, half away from zero.
///
/// # Examples
/// ```
/// use payrelay_sdk::pricing::round2;
///
/// assert_eq!(round2(8.754), 8.75);
/// assert_eq!(round2(0.125), 0.13);
/// assert_eq!(round2(-0.125), -0.13);
/// ```
#[must_use]
pub fn round2(value: f64) -> f64 {
    // f64::round rounds half away from zero, which is the behavior the
    // client form was built against.
    (value * 100.0).round() / 100.0
}

/// Format a USD amount with exactly two decimals, e.g. `"8.75"`.
#[must_use]
pub fn format_usd(value: f64) -> String {
    format!("{value:.2}")
}

/// Pricing derived for one submission, owned by the call that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedPricing {
    /// Buyer price in naira
    pub price_ngn: u64,
    /// Buyer price converted to USD, rounded to two decimals
    pub price_usd: f64,
    /// Promo-owner payout in naira
    pub earn_ngn: u64,
    /// Promo-owner payout converted to USD, rounded to two decimals
    pub earn_usd: f64,
    /// Human-readable plan label
    pub plan_label: &'static str,
}

impl ResolvedPricing {
    /// Derive pricing for a plan at the given NGN→USD rate.
    ///
    /// The pricing table is total over [`PlanCode`], so this cannot fail;
    /// the rate has already been resolved (live or fallback) by the caller.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Naira prices are far below f64's 52-bit mantissa
    pub fn resolve(plan: PlanCode, usd_rate: f64) -> Self {
        let pricing = plan.pricing();
        Self {
            price_ngn: pricing.base_price_minor,
            price_usd: round2(pricing.base_price_minor as f64 * usd_rate),
            earn_ngn: pricing.referral_payout_minor,
            earn_usd: round2(pricing.referral_payout_minor as f64 * usd_rate),
            plan_label: plan.label(),
        }
    }

    /// The `₦… ≈ $…` price rendering used in every notification body.
    #[must_use]
    pub fn price_display(&self) -> String {
        format!("₦{} ≈ ${}", self.price_ngn, format_usd(self.price_usd))
    }

    /// The `₦… ≈ $…` rendering of the promo-owner payout.
    #[must_use]
    pub fn earning_display(&self) -> String {
        format!("₦{} ≈ ${}", self.earn_ngn, format_usd(self.earn_usd))
    }
}

#[derive(Debug, Deserialize)]
struct RateResponse {
    rates: RateTable,
}

#[derive(Debug, Deserialize)]
struct RateTable {
    #[serde(rename = "USD")]
    usd: Option<f64>,
}

/// Client for the exchange-rate collaborator.
///
/// The collaborator is treated as unreliable by contract: callers get a
/// usable rate from [`RateClient::usd_rate`] no matter what happens on the
/// wire.
#[derive(Clone, Debug)]
pub struct RateClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl RateClient {
    /// Create a rate client for the given endpoint.
    ///
    /// # Errors
    /// Returns an error if the endpoint is not a valid URL or the HTTP
    /// client cannot be constructed.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| RelayError::Config(format!("invalid rate endpoint '{endpoint}': {e}")))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint })
    }

    /// Fetch the NGN→USD rate, degrading to [`FALLBACK_USD_RATE`].
    ///
    /// One attempt, no retry. A non-positive or non-finite rate from the
    /// collaborator counts as a failure.
    pub async fn usd_rate(&self) -> f64 {
        match self.fetch().await {
            Ok(rate) if rate.is_finite() && rate > 0.0 => {
                debug!(rate, "live exchange rate resolved");
                rate
            }
            Ok(rate) => {
                warn!(rate, "rate endpoint returned unusable rate, using fallback");
                FALLBACK_USD_RATE
            }
            Err(err) => {
                warn!(error = %err, "exchange rate lookup failed, using fallback");
                FALLBACK_USD_RATE
            }
        }
    }

    async fn fetch(&self) -> Result<f64> {
        let body: RateResponse = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        body.rates
            .usd
            .ok_or_else(|| RelayError::RateLookup("response missing rates.USD".to_string()))
    }
}
