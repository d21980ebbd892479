//! # Process Configuration
//!
//! Read once at startup from the environment (optionally seeded from
//! `.env` and `/secrets/api-env`) and never re-read per request. The
//! resulting values are immutable and shared behind `Arc` by
//! [`AppState`](crate::state::AppState).
//!
//! | Variable | Default | Effect when absent |
//! |----------|---------|--------------------|
//! | `API_KEYS` | empty | API-key routes fail closed with 500 |
//! | `GOOGLE_USER_EMAIL` | `james@worklocal.ca` | identity the delegated path accepts; blank accepts nobody |
//! | `SLACK_SIGNING_SECRET` | unset | webhook signatures are bypassed (logged) |
//! | `SLACK_BOT_TOKEN` | unset | reported as unconfigured by `/health` |
//! | `PORT` | 8000 | |
//! | `GOOGLE_API_BASE_URL`, `GOOGLE_API_TIMEOUT_SECS` | see `commgate-google-client` | |

use std::path::Path;

use commgate_google_client::GoogleApiConfig;
use zeroize::Zeroizing;

use crate::auth::CredentialSet;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ALLOWED_EMAIL: &str = "james@worklocal.ca";

/// Secrets file mounted by the Cloud Run deployment.
pub const SECRETS_ENV_FILE: &str = "/secrets/api-env";

/// Access guard configuration.
///
/// Custom `Debug` redacts the signing secret; the key set redacts itself.
#[derive(Clone)]
pub struct GuardConfig {
    /// Valid static API keys.
    pub api_keys: CredentialSet,
    /// The single identity accepted on the delegated OAuth path. Empty
    /// means every delegated token is refused.
    pub allowed_email: String,
    /// Slack signing secret. `None` switches signature checks to bypass.
    pub slack_signing_secret: Option<Zeroizing<String>>,
}

impl std::fmt::Debug for GuardConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardConfig")
            .field("api_keys", &self.api_keys)
            .field("allowed_email", &self.allowed_email)
            .field(
                "slack_signing_secret",
                &self.slack_signing_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    pub guard: GuardConfig,
    pub google: GoogleApiConfig,
    /// Whether `SLACK_BOT_TOKEN` is set. The token itself is not kept.
    pub slack_bot_configured: bool,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let api_keys = CredentialSet::parse(&lookup("API_KEYS").unwrap_or_default());

        // Default only when unset. Blank stays blank: nobody is allowed.
        let allowed_email = lookup("GOOGLE_USER_EMAIL")
            .map(|e| e.trim().to_string())
            .unwrap_or_else(|| DEFAULT_ALLOWED_EMAIL.to_string());

        let slack_signing_secret = lookup("SLACK_SIGNING_SECRET")
            .filter(|s| !s.is_empty())
            .map(Zeroizing::new);

        let slack_bot_configured = lookup("SLACK_BOT_TOKEN").is_some_and(|t| !t.is_empty());

        let google = GoogleApiConfig::from_lookup(&lookup)?;

        Ok(Self {
            port,
            guard: GuardConfig {
                api_keys,
                allowed_email,
                slack_signing_secret,
            },
            google,
            slack_bot_configured,
        })
    }
}

/// Seed the process environment from `.env` (working directory) and the
/// mounted secrets file. Variables already set are never overridden.
///
/// A missing file is fine; a file that exists but cannot be parsed is an
/// error.
pub fn load_env_files() -> Result<(), ConfigError> {
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(err) if err.not_found() => {}
        Err(err) => return Err(ConfigError::EnvFile(".env".to_string(), err.to_string())),
    }

    let secrets = Path::new(SECRETS_ENV_FILE);
    if secrets.exists() {
        dotenvy::from_path(secrets)
            .map_err(|e| ConfigError::EnvFile(SECRETS_ENV_FILE.to_string(), e.to_string()))?;
    }
    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT must be a valid TCP port, got {0:?}")]
    InvalidPort(String),
    #[error("failed to load environment file {0}: {1}")]
    EnvFile(String, String),
    #[error(transparent)]
    Google(#[from] commgate_google_client::config::ConfigError),
}
