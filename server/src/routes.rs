//! HTTP routes for the PayRelay server
//!
//! One boundary operation: `POST /send` sequences validate → price →
//! compose → dispatch and answers with a uniform `{ok}` envelope. The
//! client sees `400` with a message only when validation rejects the body,
//! and a generic `500` on an unexpected internal fault before dispatch;
//! once dispatch begins the response is `{ok:true}` regardless of
//! best-effort delivery outcomes, which are logged but never surfaced.

use crate::config::RelayConfig;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, Method, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use payrelay_sdk::{
    compose, dispatch_all, validate, DispatchTargets, NotificationOutcome, RateClient, RelayError,
    ResolvedPricing, SubmitRequest, Transport,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

/// Request bodies carry data-URI images; accept well beyond the 5 MiB
/// decoded proof cap.
pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Shared endpoint state, cloned per request.
#[derive(Clone)]
pub struct AppState<T> {
    pub config: Arc<RelayConfig>,
    pub transport: T,
    pub rates: RateClient,
}

/// Uniform response envelope for `POST /send`.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitResponse {
    fn ok() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
        }
    }
}

/// Build the application router.
pub fn router<T>(state: AppState<T>) -> Router
where
    T: Transport + Clone + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/send", post(submit::<T>))
        .route("/health", get(health))
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn submit<T>(
    State(state): State<AppState<T>>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> (StatusCode, Json<SubmitResponse>)
where
    T: Transport + Clone + Send + Sync + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            info!(error = %rejection, "rejected unreadable request body");
            return (
                StatusCode::BAD_REQUEST,
                Json(SubmitResponse::error("Invalid request body")),
            );
        }
    };

    match relay(&state, &request).await {
        Ok(outcomes) => {
            for outcome in outcomes.iter().filter(|o| !o.delivered) {
                warn!(
                    recipient = %outcome.role,
                    error = outcome.error.as_deref().unwrap_or("unknown"),
                    "notification not delivered"
                );
            }
            (StatusCode::OK, Json(SubmitResponse::ok()))
        }
        Err(RelayError::Validation(err)) => {
            info!(field = %err.field(), "submission rejected");
            (
                StatusCode::BAD_REQUEST,
                Json(SubmitResponse::error(err.to_string())),
            )
        }
        Err(err) => {
            error!(error = %err, "submission processing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SubmitResponse::error("Server error")),
            )
        }
    }
}

/// Sequence one accepted submission: validate, price, compose, dispatch.
///
/// Validation is the only fallible step visible to the caller; everything
/// after it is contained per recipient by the dispatcher.
async fn relay<T: Transport>(
    state: &AppState<T>,
    request: &SubmitRequest,
) -> payrelay_sdk::Result<Vec<NotificationOutcome>> {
    let submission = validate(request)?;
    info!(
        buyer = submission.buyer.id,
        plan = submission.plan.wire(),
        method = %submission.method,
        promo = %submission.promo_id,
        "incoming payment submission"
    );

    let rate = state.rates.usd_rate().await;
    let pricing = ResolvedPricing::resolve(submission.plan, rate);
    let bundle = compose(&submission, &pricing, &state.config.moderator_contact);
    let targets = DispatchTargets {
        admin: state.config.admin_chat_id,
        buyer: submission.buyer.id,
        promo_owner: submission.promo_chat_id,
    };

    Ok(dispatch_all(&state.transport, targets, &bundle, Some(&submission.proof)).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use http_body_util::BodyExt;
    use payrelay_sdk::ProofImage;
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use std::time::Duration;
    use tower::ServiceExt;

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Call {
        Text(i64),
        Photo(i64),
    }

    #[derive(Clone, Default)]
    struct MockTransport {
        calls: Arc<Mutex<Vec<Call>>>,
        fail_text_for: Option<i64>,
    }

    impl MockTransport {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().expect("lock").clone()
        }
    }

    impl Transport for MockTransport {
        async fn send_text(&self, chat_id: i64, _text: &str) -> payrelay_sdk::Result<()> {
            self.calls.lock().expect("lock").push(Call::Text(chat_id));
            if self.fail_text_for == Some(chat_id) {
                return Err(RelayError::Telegram("chat not found".to_string()));
            }
            Ok(())
        }

        async fn send_photo(
            &self,
            chat_id: i64,
            _photo: &ProofImage,
        ) -> payrelay_sdk::Result<()> {
            self.calls.lock().expect("lock").push(Call::Photo(chat_id));
            Ok(())
        }
    }

    const ADMIN_CHAT: i64 = 10;
    const BUYER_CHAT: i64 = 20;
    const PROMO_CHAT: i64 = 30;

    fn test_state(transport: MockTransport) -> AppState<MockTransport> {
        let config = RelayConfig {
            telegram_token: "123:abc".to_string(),
            admin_chat_id: ADMIN_CHAT,
            port: 0,
            // Port 9 is not listening: the rate lookup fails fast and the
            // pipeline proceeds on the fallback constant.
            rate_endpoint: "http://127.0.0.1:9/latest/NGN".to_string(),
            rate_timeout_secs: 1,
            telegram_timeout_secs: 1,
            moderator_contact: "https://wa.me/15550000000".to_string(),
        };
        let rates = RateClient::new(&config.rate_endpoint, Duration::from_secs(1))
            .expect("valid rate endpoint");
        AppState {
            config: Arc::new(config),
            transport,
            rates,
        }
    }

    fn valid_body() -> Value {
        json!({
            "buyer": { "id": BUYER_CHAT, "first_name": "Ada", "last_name": "Obi" },
            "promoId": PROMO_CHAT.to_string(),
            "plan": "7",
            "method": "bank",
            "proof": format!("data:image/png;base64,{}", BASE64.encode(b"receipt")),
            "whatsapp": "+2348012345678",
            "call": "+2348098765432",
            "desc": "paid via transfer"
        })
    }

    async fn post_send(app: Router, body: &Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/send")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let value = serde_json::from_slice(&bytes).expect("json body");
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(test_state(MockTransport::default()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_valid_submission_relays_to_all_recipients() {
        let transport = MockTransport::default();
        let app = router(test_state(transport.clone()));

        let (status, body) = post_send(app, &valid_body()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
        assert_eq!(
            transport.calls(),
            vec![
                Call::Photo(ADMIN_CHAT),
                Call::Text(ADMIN_CHAT),
                Call::Text(BUYER_CHAT),
                Call::Text(PROMO_CHAT)
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_proof_rejected_before_any_dispatch() {
        let transport = MockTransport::default();
        let app = router(test_state(transport.clone()));

        let mut body = valid_body();
        body.as_object_mut().expect("object").remove("proof");
        let (status, response) = post_send(app, &body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response,
            json!({ "ok": false, "error": "Missing required fields" })
        );
        // Strictly a precondition gate: zero transport calls.
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_promo_owner_failure_still_returns_ok() {
        let transport = MockTransport {
            fail_text_for: Some(PROMO_CHAT),
            ..MockTransport::default()
        };
        let app = router(test_state(transport.clone()));

        let (status, body) = post_send(app, &valid_body()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
        // Admin and buyer deliveries happened despite the promo failure.
        assert!(transport.calls().contains(&Call::Text(ADMIN_CHAT)));
        assert!(transport.calls().contains(&Call::Text(BUYER_CHAT)));
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_client_error() {
        let app = router(test_state(MockTransport::default()));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/send")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let body: Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["ok"], json!(false));
    }

    #[tokio::test]
    async fn test_non_numeric_promo_id_rejected() {
        let transport = MockTransport::default();
        let app = router(test_state(transport.clone()));

        let mut body = valid_body();
        body["promoId"] = json!("PROMO-ABC");
        let (status, response) = post_send(app, &body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], json!("Invalid Promo ID"));
        assert!(transport.calls().is_empty());
    }
}
