//! Static API-key verification.
//!
//! Keys come from the comma-separated `API_KEYS` variable. An empty set is
//! a valid configuration that fails closed with a 500, signalling operator
//! error rather than a bad client credential.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use zeroize::Zeroizing;

use super::{constant_time_eq, parse_bearer, AccessGuard, AuthError};
use crate::error::AppError;

/// Ordered, immutable set of valid API keys.
///
/// Custom `Debug` prints only the number of keys.
#[derive(Clone, Default)]
pub struct CredentialSet {
    keys: Vec<Zeroizing<String>>,
}

impl std::fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSet")
            .field("keys", &format_args!("[REDACTED; {}]", self.keys.len()))
            .finish()
    }
}

impl CredentialSet {
    /// Parse a comma-separated key list. Entries are trimmed and empty
    /// entries dropped, so `""`, `" , "` and an unset variable all give an
    /// empty set.
    pub fn parse(raw: &str) -> Self {
        Self::from_keys(raw.split(','))
    }

    /// Build a set from individual keys, trimming and dropping blanks.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = keys
            .into_iter()
            .filter_map(|k| {
                let k = k.as_ref().trim();
                (!k.is_empty()).then(|| Zeroizing::new(k.to_string()))
            })
            .collect();
        Self { keys }
    }

    /// Whether at least one key is configured.
    pub fn is_configured(&self) -> bool {
        !self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Membership test. Every entry is compared in constant time and the
    /// scan never exits early, so timing reveals neither which key matched
    /// nor how close a guess came.
    pub fn contains(&self, presented: &str) -> bool {
        self.keys.iter().fold(false, |found, key| {
            constant_time_eq(presented.as_bytes(), key.as_bytes()) | found
        })
    }

    /// Accept `presented` iff it is one of the configured keys.
    pub fn verify(&self, presented: &str) -> Result<ApiKey, AuthError> {
        if !self.is_configured() {
            return Err(AuthError::ServerMisconfigured);
        }
        if self.contains(presented) {
            Ok(ApiKey(Zeroizing::new(presented.to_string())))
        } else {
            Err(AuthError::InvalidCredential)
        }
    }
}

/// An accepted API key.
///
/// Handlers take this as an argument to require API-key authentication.
/// It marks the request as authenticated; the key itself is never returned
/// to a client and `Debug` redacts it.
#[derive(Clone)]
pub struct ApiKey(Zeroizing<String>);

impl ApiKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for ApiKey
where
    Arc<AccessGuard>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let guard = Arc::<AccessGuard>::from_ref(state);

        let token = parse_bearer(&parts.headers).map_err(|err| {
            tracing::warn!(path = %parts.uri.path(), reason = %err, "API key rejected");
            AppError::from(err)
        })?;

        guard.verify_static_key(token).map_err(|err| {
            match err {
                AuthError::ServerMisconfigured => tracing::error!(
                    path = %parts.uri.path(),
                    "API key check failed: API_KEYS is empty"
                ),
                _ => tracing::warn!(path = %parts.uri.path(), reason = %err, "API key rejected"),
            }
            AppError::from(err)
        })
    }
}
