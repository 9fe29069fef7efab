//! Error types for the PayRelay SDK
//!
//! Two families of errors flow through the pipeline:
//!
//! - [`ValidationError`]: the submission failed a precondition check. These
//!   are the only errors a submitting client ever sees; the endpoint maps
//!   them to a 400 response. The `Display` text of each variant is the
//!   client-facing message, while [`ValidationError::field`] identifies the
//!   offending field for logs and tests.
//! - [`RelayError`]: everything else, including transport rejections, outbound HTTP
//!   failures, bad configuration. These are contained downstream of
//!   validation and never abort an accepted submission.

use thiserror::Error;

/// Result type for PayRelay SDK operations
pub type Result<T> = std::result::Result<T, RelayError>;

/// A required submission field, in the fixed order the validator checks them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequiredField {
    /// Buyer identity block with a numeric platform id
    Buyer,
    /// Referral promo identifier
    PromoId,
    /// Plan code
    Plan,
    /// Payment method
    Method,
    /// Proof-of-payment image
    Proof,
    /// WhatsApp contact number
    Whatsapp,
    /// Phone contact number
    Call,
}

impl RequiredField {
    /// Wire name of the field as it appears in the request body.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::PromoId => "promoId",
            Self::Plan => "plan",
            Self::Method => "method",
            Self::Proof => "proof",
            Self::Whatsapp => "whatsapp",
            Self::Call => "call",
        }
    }
}

impl std::fmt::Display for RequiredField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A submission was rejected before any side effect was performed.
///
/// Checks run in a fixed order and the first failure wins, so a body missing
/// several fields always reports the earliest one.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was absent or empty.
    #[error("Missing required fields")]
    Missing(RequiredField),

    /// The promo identifier is present but is not a deliverable numeric
    /// recipient id.
    #[error("Invalid Promo ID")]
    InvalidPromoId,

    /// The plan code is not one of the recognized values.
    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    /// The payment method is not one of the recognized values.
    #[error("Unknown payment method: {0}")]
    UnknownMethod(String),

    /// The proof image could not be decoded from its data URI.
    #[error("Invalid proof image")]
    InvalidProof,

    /// The decoded proof image exceeds the size cap.
    #[error("Image must be under 5MB")]
    ProofTooLarge(usize),
}

impl ValidationError {
    /// The field that caused the rejection.
    #[must_use]
    pub const fn field(&self) -> RequiredField {
        match self {
            Self::Missing(field) => *field,
            Self::InvalidPromoId => RequiredField::PromoId,
            Self::UnknownPlan(_) => RequiredField::Plan,
            Self::UnknownMethod(_) => RequiredField::Method,
            Self::InvalidProof | Self::ProofTooLarge(_) => RequiredField::Proof,
        }
    }
}

/// Error types that can occur inside the relay pipeline
#[derive(Error, Debug)]
pub enum RelayError {
    /// The submission failed a precondition check
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The messaging transport accepted the request but reported failure
    #[error("Telegram API rejected the request: {0}")]
    Telegram(String),

    /// Outbound HTTP failure (connect, timeout, status, body decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The exchange-rate endpoint answered with an unusable body
    #[error("Exchange rate lookup failed: {0}")]
    RateLookup(String),

    /// Error from serde JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A component was constructed with invalid parameters
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Generic error with message
    #[error("Relay error: {0}")]
    Generic(String),
}

impl From<String> for RelayError {
    fn from(msg: String) -> Self {
        Self::Generic(msg)
    }
}

impl From<&str> for RelayError {
    fn from(msg: &str) -> Self {
        Self::Generic(msg.to_string())
    }
}
