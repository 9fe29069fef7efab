//! Submission wire types and the validated aggregate
//!
//! [`SubmitRequest`] is the raw, fully optional request body as the client
//! form sends it; nothing in it is trusted. [`Submission`] is the immutable
//! aggregate produced by [`crate::validation::validate`]; it exists only for
//! the duration of one request and is never persisted.

use crate::error::ValidationError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// How the buyer claims to have paid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Bank transfer
    Bank,
    /// Cryptocurrency transfer
    Crypto,
}

impl PaymentMethod {
    /// Parse a wire payment method.
    #[must_use]
    pub fn from_wire(method: &str) -> Option<Self> {
        match method {
            "bank" => Some(Self::Bank),
            "crypto" => Some(Self::Crypto),
            _ => None,
        }
    }

    /// The raw method string as submitted and as rendered to the admin.
    #[must_use]
    pub const fn wire(self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Crypto => "crypto",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire())
    }
}

/// Buyer identity block as supplied by the platform, untrusted.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BuyerRef {
    /// Numeric platform chat id
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Raw request body for `POST /send`.
///
/// Every field is optional at the serde layer so the validator, not the
/// deserializer, decides which omission is reported; the check order is
/// part of the endpoint contract.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub buyer: Option<BuyerRef>,
    #[serde(default, rename = "promoId")]
    pub promo_id: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    /// Data-URI encoded proof-of-payment image
    #[serde(default)]
    pub proof: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub call: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
}

/// Validated buyer identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Buyer {
    /// Numeric platform chat id, also the buyer-notification target
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
}

impl Buyer {
    /// Full display name with empty parts dropped.
    #[must_use]
    pub fn full_name(&self) -> String {
        match self.last_name.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(last) => format!("{} {last}", self.first_name),
            None => self.first_name.clone(),
        }
    }
}

/// A decoded proof-of-payment image ready for attachment delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofImage {
    pub bytes: Vec<u8>,
    /// MIME type claimed by the data URI, e.g. `image/png`
    pub mime: String,
    /// Attachment filename derived from the MIME type
    pub filename: String,
}

impl ProofImage {
    /// Decode a proof image from a `data:<mime>;base64,<payload>` URI.
    ///
    /// A bare base64 payload without the data-URI header is accepted and
    /// treated as `image/jpeg`.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidProof`] if the payload is not
    /// valid base64.
    pub fn from_data_uri(uri: &str) -> Result<Self, ValidationError> {
        let (mime, payload) = match uri.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest
                    .split_once(";base64,")
                    .ok_or(ValidationError::InvalidProof)?;
                let mime = if header.is_empty() { "image/jpeg" } else { header };
                (mime.to_string(), payload)
            }
            None => ("image/jpeg".to_string(), uri),
        };

        let bytes = BASE64
            .decode(payload.trim())
            .map_err(|_| ValidationError::InvalidProof)?;
        let filename = filename_for_mime(&mime);

        Ok(Self {
            bytes,
            mime,
            filename,
        })
    }

    /// Decoded image size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn filename_for_mime(mime: &str) -> String {
    let ext = match mime {
        "image/jpeg" | "image/jpg" => "jpg",
        other => other.strip_prefix("image/").unwrap_or("bin"),
    };
    format!("proof.{ext}")
}

/// The validated input aggregate for one submission.
///
/// Immutable after construction; no entity derived from it outlives the
/// request that carried it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub buyer: Buyer,
    pub plan: crate::plan::PlanCode,
    pub method: PaymentMethod,
    pub proof: ProofImage,
    pub whatsapp: String,
    pub call: String,
    pub description: Option<String>,
    /// Promo identifier exactly as submitted, used in message bodies
    pub promo_id: String,
    /// The promo owner's chat id parsed from the identifier
    pub promo_chat_id: i64,
}
