//! Slack request-signature verification.
//!
//! Slack signs each webhook with HMAC-SHA256 over
//! `"v0:" + timestamp + ":" + body`, keyed with the app's signing secret,
//! and sends `v0=<lowercase hex>` in `X-Slack-Signature` alongside
//! `X-Slack-Request-Timestamp`.
//!
//! Checks run in this order:
//!
//! 1. No signing secret configured: [`SignatureOutcome::BypassUnconfigured`].
//! 2. Either header missing or empty: `MalformedSignedRequest`.
//! 3. `|now - timestamp| > 300s`: `StaleRequest`. Clock skew and replay are
//!    indistinguishable and treated the same.
//! 4. Empty body: [`SignatureOutcome::EmptyBody`], accepted without a MAC.
//! 5. Recompute and compare in constant time: `Verified` or
//!    `SignatureMismatch`.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use http_body_util::LengthLimitError;
use sha2::Sha256;

use super::{constant_time_eq, AccessGuard, AuthError};
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

pub const SLACK_TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
pub const SLACK_SIGNATURE_HEADER: &str = "x-slack-signature";

/// Maximum accepted distance between the request timestamp and now.
pub const REPLAY_WINDOW_SECS: i64 = 300;

/// Largest webhook body the middleware will buffer for verification.
pub const MAX_SIGNED_BODY_BYTES: usize = 1024 * 1024;

const VERSION: &str = "v0";

/// How a signed request got through.
///
/// All three variants are accepted. They stay distinct so logs and
/// responses can show that a request was not actually authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureOutcome {
    /// The signature matched.
    Verified,
    /// No signing secret is configured; nothing was checked.
    BypassUnconfigured,
    /// Headers were valid and fresh but there was no body to sign.
    EmptyBody,
}

impl SignatureOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::BypassUnconfigured => "bypass_unconfigured",
            Self::EmptyBody => "empty_body",
        }
    }

    /// True only when a MAC was actually checked.
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }
}

/// Compute the `v0=<hex>` signature for `(timestamp, body)` under `secret`.
pub fn compute_signature(
    secret: &[u8],
    timestamp: &str,
    body: &str,
) -> Result<String, hmac::digest::InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret)?;
    mac.update(VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body.as_bytes());
    Ok(format!("{VERSION}={}", hex::encode(mac.finalize().into_bytes())))
}

/// Verify a signed request against an explicit `now`.
///
/// `secret` is `None` when no signing secret is configured.
pub fn verify_signed_request_at(
    secret: Option<&str>,
    headers: &HeaderMap,
    body: &[u8],
    now: DateTime<Utc>,
) -> Result<SignatureOutcome, AuthError> {
    let Some(secret) = secret else {
        return Ok(SignatureOutcome::BypassUnconfigured);
    };

    let timestamp = header_str(headers, SLACK_TIMESTAMP_HEADER)
        .ok_or(AuthError::MalformedSignedRequest("missing request timestamp"))?;
    let provided = header_str(headers, SLACK_SIGNATURE_HEADER)
        .ok_or(AuthError::MalformedSignedRequest("missing signature"))?;

    let sent_at: f64 = timestamp
        .trim()
        .parse()
        .ok()
        .filter(|t: &f64| t.is_finite())
        .ok_or(AuthError::MalformedSignedRequest("timestamp is not a number"))?;

    let now_secs = now.timestamp_millis() as f64 / 1000.0;
    if (now_secs - sent_at).abs() > REPLAY_WINDOW_SECS as f64 {
        return Err(AuthError::StaleRequest);
    }

    if body.is_empty() {
        return Ok(SignatureOutcome::EmptyBody);
    }

    let body = std::str::from_utf8(body)
        .map_err(|_| AuthError::MalformedSignedRequest("body is not valid UTF-8"))?;

    let expected = compute_signature(secret.as_bytes(), timestamp, body)
        .map_err(|_| AuthError::SignatureMismatch)?;

    if constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
        Ok(SignatureOutcome::Verified)
    } else {
        Err(AuthError::SignatureMismatch)
    }
}

/// Whether a body read failed because it hit the `to_bytes` limit.
fn exceeded_length_limit(err: &axum::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// Middleware guarding Slack webhook routes.
///
/// Buffers the body (up to [`MAX_SIGNED_BODY_BYTES`]), verifies it, puts
/// the [`SignatureOutcome`] in request extensions and hands the unchanged
/// body to the handler. Rejections short-circuit with 401.
pub async fn require_slack_signature(
    State(guard): State<Arc<AccessGuard>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_SIGNED_BODY_BYTES)
        .await
        .map_err(|err| {
            if exceeded_length_limit(&err) {
                tracing::warn!(
                    path = %parts.uri.path(),
                    limit = MAX_SIGNED_BODY_BYTES,
                    "signed request body too large"
                );
                AppError::PayloadTooLarge(format!(
                    "request body exceeds {MAX_SIGNED_BODY_BYTES} bytes"
                ))
            } else {
                tracing::warn!(error = %err, "failed to buffer signed request body");
                AppError::BadRequest("request body unreadable".to_string())
            }
        })?;

    let outcome = guard
        .verify_signed_request(&parts.headers, &bytes)
        .map_err(|err| {
            tracing::warn!(path = %parts.uri.path(), reason = %err, "Slack signature rejected");
            AppError::from(err)
        })?;

    match outcome {
        SignatureOutcome::Verified => {
            tracing::debug!(path = %parts.uri.path(), "Slack signature verified")
        }
        SignatureOutcome::BypassUnconfigured => tracing::warn!(
            path = %parts.uri.path(),
            outcome = outcome.as_str(),
            "Slack signature NOT verified: SLACK_SIGNING_SECRET is not configured"
        ),
        SignatureOutcome::EmptyBody => tracing::warn!(
            path = %parts.uri.path(),
            outcome = outcome.as_str(),
            "Slack request accepted without a body to verify"
        ),
    }

    parts.extensions.insert(outcome);
    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}
