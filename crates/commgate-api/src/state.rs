//! # Application State
//!
//! Shared, read-only state passed to handlers via the `State` extractor.
//! Nothing in here changes after startup.

use std::sync::Arc;

use commgate_google_client::{GoogleApiError, TokenInfoClient};

use crate::auth::AccessGuard;
use crate::config::AppConfig;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub guard: Arc<AccessGuard>,
    /// Whether a Slack bot token is configured (reported by `/health`).
    pub slack_bot_configured: bool,
}

impl AppState {
    /// Build the state from loaded configuration.
    ///
    /// Fails only if the HTTP client for token introspection cannot be
    /// constructed.
    pub fn new(config: AppConfig) -> Result<Self, GoogleApiError> {
        let tokeninfo = TokenInfoClient::new(config.google)?;
        Ok(Self {
            guard: Arc::new(AccessGuard::new(config.guard, tokeninfo)),
            slack_bot_configured: config.slack_bot_configured,
        })
    }
}
