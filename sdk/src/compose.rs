//! Message composition
//!
//! A deterministic formatting step: pure functions of the validated
//! submission and its resolved pricing, no I/O, byte-identical output for
//! identical input. Each recipient role has its own template:
//!
//! - the buyer sees a confirmation without any administrator-only data
//! - the administrator sees the full submission detail; the proof image
//!   travels as an attachment, never inlined into text
//! - the promo owner sees the payout but never the buyer's contact fields
//!   or raw identity id

use crate::pricing::ResolvedPricing;
use crate::submission::Submission;

/// The three composed message bodies for one submission.
///
/// The proof attachment is not carried here; it stays on the submission and
/// is delivered alongside the admin text by the dispatcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageBundle {
    pub buyer_text: String,
    pub admin_text: String,
    pub promo_text: String,
}

/// Compose all three recipient messages.
#[must_use]
pub fn compose(
    submission: &Submission,
    pricing: &ResolvedPricing,
    moderator_contact: &str,
) -> MessageBundle {
    MessageBundle {
        buyer_text: buyer_text(submission, pricing, moderator_contact),
        admin_text: admin_text(submission, pricing),
        promo_text: promo_owner_text(submission, pricing),
    }
}

/// Confirmation sent to the buyer. Carries no administrator-only data.
#[must_use]
pub fn buyer_text(
    submission: &Submission,
    pricing: &ResolvedPricing,
    moderator_contact: &str,
) -> String {
    format!(
        "✅ Premium Payment Submitted\n\
         \n\
         Plan: {plan}\n\
         Price: {price}\n\
         Promo ID: {promo}\n\
         WhatsApp: {whatsapp}\n\
         \n\
         Contact moderator:\n\
         {moderator_contact}",
        plan = pricing.plan_label,
        price = pricing.price_display(),
        promo = submission.promo_id,
        whatsapp = submission.whatsapp,
    )
}

/// Full submission detail for the administrator.
#[must_use]
pub fn admin_text(submission: &Submission, pricing: &ResolvedPricing) -> String {
    format!(
        "🚨 NEW PREMIUM PAYMENT\n\
         \n\
         Buyer: {name}\n\
         Telegram ID: {id}\n\
         \n\
         Plan: {plan}\n\
         Price: {price}\n\
         Payment: {method}\n\
         \n\
         Promo ID: {promo}\n\
         WhatsApp: {whatsapp}\n\
         Call: {call}\n\
         \n\
         Description:\n\
         {desc}",
        name = submission.buyer.full_name(),
        id = submission.buyer.id,
        plan = pricing.plan_label,
        price = pricing.price_display(),
        method = submission.method,
        promo = submission.promo_id,
        whatsapp = submission.whatsapp,
        call = submission.call,
        desc = submission.description.as_deref().unwrap_or("N/A"),
    )
}

/// Earnings notice for the promo owner. Never reveals the buyer's contact
/// fields or raw identity id.
#[must_use]
pub fn promo_owner_text(submission: &Submission, pricing: &ResolvedPricing) -> String {
    format!(
        "🎉 Someone used your promo ID!\n\
         \n\
         Buyer: {first}\n\
         Plan: {plan}\n\
         Price: {price}\n\
         \n\
         Your earning:\n\
         {earning}",
        first = submission.buyer.first_name,
        plan = pricing.plan_label,
        price = pricing.price_display(),
        earning = pricing.earning_display(),
    )
}
