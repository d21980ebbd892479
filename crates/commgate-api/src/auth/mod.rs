//! # Access Guard
//!
//! Every protected endpoint sits behind exactly one of three independent
//! verification strategies. The route chooses which one by the extractor or
//! layer it uses; nothing is auto-detected.
//!
//! | Strategy | Entry point | Credential |
//! |----------|-------------|------------|
//! | Static API key | [`ApiKey`] extractor | `Authorization: Bearer <key>` checked against `API_KEYS` |
//! | Delegated OAuth | [`DelegatedIdentity`] extractor | optional `Authorization: Bearer <token>` introspected at Google |
//! | Signed webhook | [`require_slack_signature`] layer | `X-Slack-Request-Timestamp` + `X-Slack-Signature` over the raw body |
//!
//! The guard is stateless. It holds only the immutable [`GuardConfig`]
//! loaded at startup and a token-info client. Credential material is never
//! logged and never echoed back in a response.

mod api_key;
mod delegated;
mod signature;

pub use api_key::{ApiKey, CredentialSet};
pub use delegated::DelegatedIdentity;
pub use signature::{
    compute_signature, require_slack_signature, verify_signed_request_at, SignatureOutcome,
    MAX_SIGNED_BODY_BYTES, REPLAY_WINDOW_SECS, SLACK_SIGNATURE_HEADER, SLACK_TIMESTAMP_HEADER,
};

use std::sync::Arc;

use axum::extract::FromRef;
use axum::http::{header, HeaderMap};
use chrono::Utc;
use commgate_google_client::{TokenInfo, TokenInfoClient};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::config::GuardConfig;
use crate::state::AppState;

/// Why the guard refused a request.
///
/// The `Display` strings are for logs. The client-facing wording lives in
/// the `From<AuthError> for AppError` conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No usable `Authorization: Bearer` header on the API-key path.
    #[error("missing bearer credentials")]
    MissingCredentials,

    /// `Authorization` carries credentials under a scheme other than Bearer.
    #[error("unsupported authorization scheme")]
    UnsupportedScheme,

    /// The credential set is empty. Operator error, not client error.
    #[error("API keys not configured on server")]
    ServerMisconfigured,

    /// The presented API key is not in the credential set.
    #[error("invalid API key")]
    InvalidCredential,

    /// Google did not accept the delegated token (or could not be reached).
    #[error("invalid Google OAuth token")]
    InvalidToken,

    /// Google accepted the token but it belongs to someone else.
    #[error("token not authorized for this user")]
    IdentityNotAuthorized,

    /// Signed request is structurally unusable.
    #[error("malformed signed request: {0}")]
    MalformedSignedRequest(&'static str),

    /// Signed request timestamp is outside the replay window.
    #[error("signed request timestamp outside the replay window")]
    StaleRequest,

    /// Signature does not match the body.
    #[error("signature mismatch")]
    SignatureMismatch,
}

/// The access guard: immutable configuration plus the introspection client.
pub struct AccessGuard {
    config: GuardConfig,
    tokeninfo: TokenInfoClient,
}

impl std::fmt::Debug for AccessGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGuard")
            .field("config", &self.config)
            .field("tokeninfo_base_url", &self.tokeninfo.base_url().as_str())
            .finish()
    }
}

impl AccessGuard {
    pub fn new(config: GuardConfig, tokeninfo: TokenInfoClient) -> Self {
        Self { config, tokeninfo }
    }

    /// The single identity allowed on the delegated-token path.
    pub fn allowed_email(&self) -> &str {
        &self.config.allowed_email
    }

    /// Whether webhook signatures are actually checked.
    pub fn signature_verification_enabled(&self) -> bool {
        self.config.slack_signing_secret.is_some()
    }

    /// Check a presented API key against the configured credential set.
    ///
    /// An empty credential set fails with [`AuthError::ServerMisconfigured`]
    /// whatever the token, so an unconfigured deployment never lets anyone in.
    pub fn verify_static_key(&self, presented: &str) -> Result<ApiKey, AuthError> {
        self.config.api_keys.verify(presented)
    }

    /// Validate an optional delegated OAuth token.
    ///
    /// `None` in, `Ok(None)` out: endpoints may treat delegated auth as
    /// optional. A present token costs one call to Google, bounded by the
    /// client timeout and never retried.
    pub async fn verify_delegated_token(
        &self,
        token: Option<&str>,
    ) -> Result<Option<TokenInfo>, AuthError> {
        let Some(token) = token else {
            return Ok(None);
        };
        delegated::introspect(&self.tokeninfo, token, &self.config.allowed_email)
            .await
            .map(Some)
    }

    /// Verify a Slack-signed request against the current wall clock.
    pub fn verify_signed_request(
        &self,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<SignatureOutcome, AuthError> {
        let secret = self
            .config
            .slack_signing_secret
            .as_ref()
            .map(|s| s.as_str());
        verify_signed_request_at(secret, headers, body, Utc::now())
    }
}

impl FromRef<AppState> for Arc<AccessGuard> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.guard)
    }
}

/// Parse an `Authorization: Bearer <token>` header.
///
/// No header, no scheme or no token is [`AuthError::MissingCredentials`];
/// a complete header under another scheme is
/// [`AuthError::UnsupportedScheme`]. The scheme is matched
/// case-insensitively.
pub(crate) fn parse_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;
    let (scheme, token) = value.split_once(' ').unwrap_or((value, ""));
    if scheme.is_empty() || token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::UnsupportedScheme);
    }
    Ok(token)
}

/// The bearer token, if the request carries a usable one.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    parse_bearer(headers).ok()
}

/// Constant-time byte comparison.
///
/// When lengths differ, performs a dummy comparison so a length mismatch
/// takes roughly as long as a content mismatch.
pub(crate) fn constant_time_eq(provided: &[u8], expected: &[u8]) -> bool {
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}
