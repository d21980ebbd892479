//! Google API client configuration.
//!
//! Defaults point at the production Google APIs host. Override via
//! environment variables or explicit construction for testing.

use url::Url;

/// Default host for `oauth2/v1/tokeninfo`.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

/// Default upper bound on a single introspection round trip.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Configuration for connecting to the Google token-info endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleApiConfig {
    /// Base URL the token-info path is resolved against.
    /// Default: <https://www.googleapis.com>
    pub base_url: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl GoogleApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `GOOGLE_API_BASE_URL` (default: `https://www.googleapis.com`)
    /// - `GOOGLE_API_TIMEOUT_SECS` (default: 5)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// `from_env` delegates here; tests pass a closure over a map instead
    /// of mutating the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url =
            lookup("GOOGLE_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&raw_url).map_err(|e| {
            ConfigError::InvalidUrl("GOOGLE_API_BASE_URL".to_string(), e.to_string())
        })?;

        let timeout_secs = match lookup("GOOGLE_API_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) | Err(_) => return Err(ConfigError::InvalidTimeout(raw)),
                Ok(secs) => secs,
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            timeout_secs,
        })
    }

    /// Create a configuration pointing at a local mock server.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base_url` cannot be parsed.
    pub fn local_mock(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidUrl("mock".to_string(), e.to_string()))?;
        Ok(Self {
            base_url,
            timeout_secs: 2,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("GOOGLE_API_TIMEOUT_SECS must be a positive integer, got {0:?}")]
    InvalidTimeout(String),
}
