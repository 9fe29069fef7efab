//! PayRelay server - HTTP boundary for the payment submission relay
//!
//! Loads configuration from the environment (failing fast when credentials
//! are absent), wires the Telegram transport and the exchange-rate client
//! into the endpoint state, and serves the submission endpoint until a
//! shutdown signal arrives.

#![forbid(unsafe_code)]

mod config;
mod routes;

use anyhow::{Context, Result};
use clap::Parser;
use config::RelayConfig;
use payrelay_sdk::{RateClient, TelegramClient};
use routes::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "payrelay-server",
    version,
    about = "Relay payment submissions to Telegram recipients"
)]
struct Cli {
    /// Listen port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Exchange-rate endpoint URL (overrides RATE_URL)
    #[arg(long)]
    rate_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = RelayConfig::from_env()?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(rate_url) = cli.rate_url {
        config.rate_endpoint = rate_url;
    }

    let transport = TelegramClient::new(
        &config.telegram_token,
        Duration::from_secs(config.telegram_timeout_secs),
    )?;
    let rates = RateClient::new(
        &config.rate_endpoint,
        Duration::from_secs(config.rate_timeout_secs),
    )?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState {
        config: Arc::new(config),
        transport,
        rates,
    };
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("payrelay-server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install shutdown handler");
        return;
    }
    info!("shutdown signal received");
}
