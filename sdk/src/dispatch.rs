//! Notification dispatch with per-recipient failure isolation
//!
//! Every submission fans out to three recipients. Each delivery is guarded
//! independently: a failure is caught, logged, and recorded in that
//! recipient's [`NotificationOutcome`], and never prevents the remaining
//! attempts. The caller receives one outcome per recipient.

use crate::compose::MessageBundle;
use crate::error::Result;
use crate::submission::ProofImage;
use std::future::Future;
use tracing::{info, warn};

/// Messaging transport consumed by the dispatcher.
///
/// Implemented by [`crate::telegram::TelegramClient`] in production and by
/// in-memory fakes in tests.
pub trait Transport {
    /// Deliver one text message to one chat.
    fn send_text(&self, chat_id: i64, text: &str) -> impl Future<Output = Result<()>> + Send;

    /// Deliver one image to one chat.
    fn send_photo(&self, chat_id: i64, photo: &ProofImage)
        -> impl Future<Output = Result<()>> + Send;
}

/// The recipient of one notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecipientRole {
    Buyer,
    Admin,
    PromoOwner,
}

impl std::fmt::Display for RecipientRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Buyer => "buyer",
            Self::Admin => "admin",
            Self::PromoOwner => "promo_owner",
        })
    }
}

/// Per-recipient delivery result. Never persisted; exists only to build the
/// aggregated response and the request log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationOutcome {
    pub role: RecipientRole,
    pub delivered: bool,
    pub error: Option<String>,
}

impl NotificationOutcome {
    fn delivered(role: RecipientRole, detail: Option<String>) -> Self {
        Self {
            role,
            delivered: true,
            error: detail,
        }
    }

    fn failed(role: RecipientRole, detail: String) -> Self {
        Self {
            role,
            delivered: false,
            error: Some(detail),
        }
    }
}

/// Chat targets for the three recipients of one submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchTargets {
    pub admin: i64,
    pub buyer: i64,
    pub promo_owner: i64,
}

/// Deliver all three composed messages, isolating failures per recipient.
///
/// The admin delivery is always attempted first: the proof image (when
/// present) before the admin text, with an image failure recorded but never
/// cancelling the text. Buyer and promo-owner deliveries are best-effort;
/// their failures are logged and recorded, never surfaced to the submitting
/// client.
pub async fn dispatch_all<T: Transport>(
    transport: &T,
    targets: DispatchTargets,
    bundle: &MessageBundle,
    proof: Option<&ProofImage>,
) -> Vec<NotificationOutcome> {
    let mut outcomes = Vec::with_capacity(3);

    // Admin: photo first, then text; the photo failure is carried as detail
    // on the admin outcome either way.
    let mut photo_error = None;
    if let Some(proof) = proof {
        if let Err(err) = transport.send_photo(targets.admin, proof).await {
            warn!(error = %err, "proof image delivery to admin failed");
            photo_error = Some(format!("proof image: {err}"));
        }
    }
    let admin_outcome = match transport.send_text(targets.admin, &bundle.admin_text).await {
        Ok(()) => NotificationOutcome::delivered(RecipientRole::Admin, photo_error),
        Err(err) => {
            warn!(error = %err, "admin notification failed");
            let detail = match photo_error {
                Some(photo) => format!("{photo}; text: {err}"),
                None => err.to_string(),
            };
            NotificationOutcome::failed(RecipientRole::Admin, detail)
        }
    };
    outcomes.push(admin_outcome);

    outcomes.push(
        deliver_text(
            transport,
            RecipientRole::Buyer,
            targets.buyer,
            &bundle.buyer_text,
        )
        .await,
    );
    outcomes.push(
        deliver_text(
            transport,
            RecipientRole::PromoOwner,
            targets.promo_owner,
            &bundle.promo_text,
        )
        .await,
    );

    info!(
        delivered = outcomes.iter().filter(|o| o.delivered).count(),
        total = outcomes.len(),
        "dispatch complete"
    );
    outcomes
}

async fn deliver_text<T: Transport>(
    transport: &T,
    role: RecipientRole,
    chat_id: i64,
    text: &str,
) -> NotificationOutcome {
    match transport.send_text(chat_id, text).await {
        Ok(()) => NotificationOutcome::delivered(role, None),
        Err(err) => {
            warn!(recipient = %role, error = %err, "notification failed");
            NotificationOutcome::failed(role, err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelayError;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Call {
        Text(i64),
        Photo(i64),
    }

    /// In-memory transport that records calls and fails on command.
    #[derive(Clone, Default)]
    struct MockTransport {
        calls: Arc<Mutex<Vec<Call>>>,
        fail_text_for: Option<i64>,
        fail_photos: bool,
    }

    impl MockTransport {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().expect("lock").clone()
        }
    }

    impl Transport for MockTransport {
        async fn send_text(&self, chat_id: i64, _text: &str) -> Result<()> {
            self.calls.lock().expect("lock").push(Call::Text(chat_id));
            if self.fail_text_for == Some(chat_id) {
                return Err(RelayError::Telegram("chat not found".to_string()));
            }
            Ok(())
        }

        async fn send_photo(&self, chat_id: i64, _photo: &ProofImage) -> Result<()> {
            self.calls.lock().expect("lock").push(Call::Photo(chat_id));
            if self.fail_photos {
                return Err(RelayError::Telegram("photo rejected".to_string()));
            }
            Ok(())
        }
    }

    const TARGETS: DispatchTargets = DispatchTargets {
        admin: 10,
        buyer: 20,
        promo_owner: 30,
    };

    fn bundle() -> MessageBundle {
        MessageBundle {
            buyer_text: "buyer".to_string(),
            admin_text: "admin".to_string(),
            promo_text: "promo".to_string(),
        }
    }

    fn proof() -> ProofImage {
        ProofImage {
            bytes: b"receipt".to_vec(),
            mime: "image/png".to_string(),
            filename: "proof.png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_all_deliveries_succeed() {
        let transport = MockTransport::default();
        let outcomes = dispatch_all(&transport, TARGETS, &bundle(), Some(&proof())).await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.delivered));
        assert!(outcomes.iter().all(|o| o.error.is_none()));

        // Photo precedes the admin text; buyer and promo owner follow.
        assert_eq!(
            transport.calls(),
            vec![
                Call::Photo(10),
                Call::Text(10),
                Call::Text(20),
                Call::Text(30)
            ]
        );
    }

    #[tokio::test]
    async fn test_buyer_failure_never_blocks_siblings() {
        let transport = MockTransport {
            fail_text_for: Some(TARGETS.buyer),
            ..MockTransport::default()
        };
        let outcomes = dispatch_all(&transport, TARGETS, &bundle(), Some(&proof())).await;

        let admin = &outcomes[0];
        let buyer = &outcomes[1];
        let promo = &outcomes[2];

        assert_eq!(admin.role, RecipientRole::Admin);
        assert!(admin.delivered);
        assert!(!buyer.delivered);
        assert!(buyer.error.as_deref().unwrap_or("").contains("chat not found"));
        assert!(promo.delivered);

        // All three were attempted despite the buyer failure.
        assert_eq!(transport.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_promo_owner_failure_is_contained() {
        let transport = MockTransport {
            fail_text_for: Some(TARGETS.promo_owner),
            ..MockTransport::default()
        };
        let outcomes = dispatch_all(&transport, TARGETS, &bundle(), Some(&proof())).await;

        assert!(outcomes[0].delivered);
        assert!(outcomes[1].delivered);
        assert!(!outcomes[2].delivered);
    }

    #[tokio::test]
    async fn test_photo_failure_does_not_cancel_admin_text() {
        let transport = MockTransport {
            fail_photos: true,
            ..MockTransport::default()
        };
        let outcomes = dispatch_all(&transport, TARGETS, &bundle(), Some(&proof())).await;

        let admin = &outcomes[0];
        assert!(admin.delivered);
        assert!(admin.error.as_deref().unwrap_or("").contains("proof image"));

        // The admin text was still sent after the photo failed.
        assert!(transport.calls().contains(&Call::Text(10)));
    }

    #[tokio::test]
    async fn test_admin_text_failure_recorded_with_photo_detail() {
        let transport = MockTransport {
            fail_text_for: Some(TARGETS.admin),
            fail_photos: true,
            ..MockTransport::default()
        };
        let outcomes = dispatch_all(&transport, TARGETS, &bundle(), Some(&proof())).await;

        let admin = &outcomes[0];
        assert!(!admin.delivered);
        let detail = admin.error.as_deref().expect("error detail");
        assert!(detail.contains("proof image"));
        assert!(detail.contains("text:"));

        // Siblings still attempted.
        assert!(outcomes[1].delivered);
        assert!(outcomes[2].delivered);
    }

    #[tokio::test]
    async fn test_dispatch_without_attachment() {
        let transport = MockTransport::default();
        let outcomes = dispatch_all(&transport, TARGETS, &bundle(), None).await;

        assert!(outcomes.iter().all(|o| o.delivered));
        assert_eq!(
            transport.calls(),
            vec![Call::Text(10), Call::Text(20), Call::Text(30)]
        );
    }
}
