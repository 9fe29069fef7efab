//! PayRelay SDK - core pipeline for the payment submission relay
//!
//! This crate implements the server-side pipeline that turns one payment
//! claim from the client form into three recipient notifications. It
//! includes:
//!
//! - Validating the raw submission body into an immutable [`Submission`]
//! - Resolving localized pricing with a live exchange rate and a fixed
//!   fallback constant
//! - Composing the buyer, administrator, and promo-owner message bodies
//! - Dispatching each message over the Telegram transport with
//!   per-recipient failure isolation
//!
//! Everything here is request-scoped: no submission state outlives the
//! request that carried it, and the only process-lifetime data is the
//! static pricing table.
//!
//! # Example
//!
//! ```no_run
//! use payrelay_sdk::{compose, dispatch, pricing, validation, SubmitRequest, TelegramClient};
//! use std::time::Duration;
//!
//! # async fn relay(request: SubmitRequest) -> payrelay_sdk::Result<()> {
//! let submission = validation::validate(&request)?;
//! let rates = pricing::RateClient::new(
//!     "https://api.exchangerate-api.com/v4/latest/NGN",
//!     Duration::from_secs(5),
//! )?;
//! let resolved = pricing::ResolvedPricing::resolve(submission.plan, rates.usd_rate().await);
//! let bundle = compose::compose(&submission, &resolved, "https://wa.me/2349114301708");
//!
//! let transport = TelegramClient::new("bot-token", Duration::from_secs(15))?;
//! let targets = dispatch::DispatchTargets {
//!     admin: 111,
//!     buyer: submission.buyer.id,
//!     promo_owner: submission.promo_chat_id,
//! };
//! let outcomes =
//!     dispatch::dispatch_all(&transport, targets, &bundle, Some(&submission.proof)).await;
//! # let _ = outcomes;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc)]

pub mod compose;
pub mod dispatch;
pub mod error;
pub mod plan;
pub mod pricing;
pub mod submission;
pub mod telegram;
pub mod validation;

// Re-export commonly used items
pub use compose::{compose, MessageBundle};
pub use dispatch::{
    dispatch_all, DispatchTargets, NotificationOutcome, RecipientRole, Transport,
};
pub use error::{RelayError, RequiredField, Result, ValidationError};
pub use plan::{PlanCode, PlanPricing};
pub use pricing::{RateClient, ResolvedPricing, FALLBACK_USD_RATE};
pub use submission::{Buyer, PaymentMethod, ProofImage, SubmitRequest, Submission};
pub use telegram::TelegramClient;
pub use validation::{validate, MAX_PROOF_BYTES};
