//! Submission validation
//!
//! The validator is a strict precondition gate: it performs no I/O, and on
//! any failure the caller must not perform the exchange-rate lookup or any
//! dispatch. Checks run in a fixed order so a body missing several fields
//! deterministically reports the first one:
//!
//! 1. buyer identity present with a numeric id
//! 2. promo identifier present and parseable as a recipient chat id
//! 3. plan code recognized
//! 4. payment method recognized
//! 5. proof image attached, decodable, within the size cap
//! 6. contact fields (whatsapp, call) non-empty
//!
//! The promo check is authoritative here on the server; the client's static
//! allow-list is presentation glue and is not consulted.

use crate::error::{RequiredField, ValidationError};
use crate::plan::PlanCode;
use crate::submission::{Buyer, PaymentMethod, ProofImage, SubmitRequest, Submission};

/// Maximum decoded proof image size: 5 MiB.
pub const MAX_PROOF_BYTES: usize = 5 * 1024 * 1024;

fn non_empty(value: Option<&str>, field: RequiredField) -> Result<String, ValidationError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError::Missing(field)),
    }
}

/// Validate a raw request body into an immutable [`Submission`].
///
/// # Errors
/// Returns the [`ValidationError`] for the first check that fails, in the
/// fixed order documented on this module.
pub fn validate(request: &SubmitRequest) -> Result<Submission, ValidationError> {
    // 1. Buyer identity with a numeric id
    let buyer_ref = request
        .buyer
        .as_ref()
        .ok_or(ValidationError::Missing(RequiredField::Buyer))?;
    let buyer_id = buyer_ref
        .id
        .ok_or(ValidationError::Missing(RequiredField::Buyer))?;
    let buyer = Buyer {
        id: buyer_id,
        first_name: buyer_ref.first_name.clone().unwrap_or_default(),
        last_name: buyer_ref.last_name.clone(),
    };

    // 2. Promo identifier, deliverable as a chat id
    let promo_id = non_empty(request.promo_id.as_deref(), RequiredField::PromoId)?;
    let promo_chat_id: i64 = promo_id
        .parse()
        .map_err(|_| ValidationError::InvalidPromoId)?;

    // 3. Plan code
    let plan_raw = non_empty(request.plan.as_deref(), RequiredField::Plan)?;
    let plan = PlanCode::from_wire(&plan_raw).ok_or(ValidationError::UnknownPlan(plan_raw))?;

    // 4. Payment method
    let method_raw = non_empty(request.method.as_deref(), RequiredField::Method)?;
    let method =
        PaymentMethod::from_wire(&method_raw).ok_or(ValidationError::UnknownMethod(method_raw))?;

    // 5. Proof image
    let proof_raw = request
        .proof
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .ok_or(ValidationError::Missing(RequiredField::Proof))?;
    let proof = ProofImage::from_data_uri(proof_raw)?;
    if proof.len() > MAX_PROOF_BYTES {
        return Err(ValidationError::ProofTooLarge(proof.len()));
    }

    // 6. Contact fields
    let whatsapp = non_empty(request.whatsapp.as_deref(), RequiredField::Whatsapp)?;
    let call = non_empty(request.call.as_deref(), RequiredField::Call)?;

    let description = request
        .desc
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(ToString::to_string);

    Ok(Submission {
        buyer,
        plan,
        method,
        proof,
        whatsapp,
        call,
        description,
        promo_id,
        promo_chat_id,
    })
}
