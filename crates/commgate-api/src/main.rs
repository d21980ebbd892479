//! # commgate-api: Binary Entry Point
//!
//! Loads `.env` files, reads configuration and serves the gateway on
//! `0.0.0.0:$PORT` (default 8000).

use commgate_api::config::{load_env_files, AppConfig};
use commgate_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Env files first so RUST_LOG and LOG_FORMAT can come from them.
    let env_files = load_env_files();

    init_tracing();

    if let Err(e) = env_files {
        tracing::error!("Failed to load environment file: {e}");
        return Err(e.into());
    }

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {e}");
        e
    })?;

    if !config.guard.api_keys.is_configured() {
        tracing::warn!("API_KEYS is not set. API-key routes will answer 500.");
    }
    if config.guard.allowed_email.is_empty() {
        tracing::warn!("GOOGLE_USER_EMAIL is blank. Every delegated token will be refused.");
    }
    if config.guard.slack_signing_secret.is_none() {
        tracing::warn!(
            "SLACK_SIGNING_SECRET is not set. Slack webhook signatures will NOT be verified."
        );
    }
    tracing::info!(
        api_keys = config.guard.api_keys.len(),
        allowed_email = %config.guard.allowed_email,
        google_api = %config.google.base_url,
        slack_bot_configured = config.slack_bot_configured,
        "configuration loaded"
    );

    let port = config.port;
    let state = AppState::new(config).map_err(|e| {
        tracing::error!("Failed to create Google API client: {e}");
        e
    })?;

    let app = commgate_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Communication gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Structured logging; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
