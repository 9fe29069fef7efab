//! Telegram Bot API transport
//!
//! Implements [`Transport`] over the Bot API: `sendMessage` as a JSON call
//! and `sendPhoto` as a multipart upload carrying the proof image as an
//! attachment. The API reports logical failure in-band (`ok: false` with a
//! description), so bodies are parsed even on non-2xx responses and an
//! `ok: false` answer is mapped to [`RelayError::Telegram`].

use crate::dispatch::Transport;
use crate::error::{RelayError, Result};
use crate::submission::ProofImage;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use url::Url;

const API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
}

impl ApiResponse {
    fn into_result(self) -> Result<()> {
        if self.ok {
            Ok(())
        } else {
            Err(RelayError::Telegram(
                self.description
                    .unwrap_or_else(|| "no description".to_string()),
            ))
        }
    }
}

/// Telegram Bot API client.
///
/// One instance is shared across submissions; it holds no per-request
/// state beyond the pooled HTTP connections.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base: Url,
}

impl TelegramClient {
    /// Create a client for the given bot token.
    ///
    /// # Errors
    /// Returns an error if the token is empty or the HTTP client cannot be
    /// constructed.
    pub fn new(token: &str, timeout: Duration) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(RelayError::Config("empty Telegram bot token".to_string()));
        }
        let base = Url::parse(&format!("{API_BASE}/bot{token}/"))
            .map_err(|e| RelayError::Config(format!("invalid Telegram bot token: {e}")))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    fn method_url(&self, method: &str) -> Result<Url> {
        self.base
            .join(method)
            .map_err(|e| RelayError::Config(format!("invalid API method '{method}': {e}")))
    }
}

// The base URL embeds the bot token; keep it out of logs.
impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient").finish_non_exhaustive()
    }
}

impl Transport for TelegramClient {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        let response: ApiResponse = self
            .http
            .post(self.method_url("sendMessage")?)
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await?
            .json()
            .await?;
        debug!(chat_id, ok = response.ok, "sendMessage completed");
        response.into_result()
    }

    async fn send_photo(&self, chat_id: i64, photo: &ProofImage) -> Result<()> {
        let part = Part::bytes(photo.bytes.clone())
            .file_name(photo.filename.clone())
            .mime_str(&photo.mime)?;
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("photo", part);

        let response: ApiResponse = self
            .http
            .post(self.method_url("sendPhoto")?)
            .multipart(form)
            .send()
            .await?
            .json()
            .await?;
        debug!(chat_id, ok = response.ok, "sendPhoto completed");
        response.into_result()
    }
}
