//! Delegated OAuth token verification.
//!
//! The token is introspected at Google's token-info endpoint and its
//! `email` claim must equal the single configured identity. Any failure to
//! get a 200 with a decodable body (including timeouts and an unreachable
//! provider) is reported as an invalid token; the client cannot tell a
//! provider outage from a bad token.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use commgate_google_client::{GoogleApiError, TokenInfo, TokenInfoClient};

use super::{bearer_token, AccessGuard, AuthError};
use crate::error::AppError;

pub(super) async fn introspect(
    client: &TokenInfoClient,
    token: &str,
    allowed_email: &str,
) -> Result<TokenInfo, AuthError> {
    let info = client.tokeninfo(token).await.map_err(|err| {
        match &err {
            GoogleApiError::ApiError { status, .. } => {
                tracing::warn!(status = *status, "delegated token rejected by identity provider")
            }
            other => {
                tracing::warn!(error = %other, "delegated token introspection failed")
            }
        }
        AuthError::InvalidToken
    })?;

    if allowed_email.is_empty() || info.email.as_deref() != Some(allowed_email) {
        tracing::warn!(
            has_email = info.email.is_some(),
            "delegated token belongs to a different identity"
        );
        return Err(AuthError::IdentityNotAuthorized);
    }

    Ok(info)
}

/// Optional delegated identity.
///
/// `DelegatedIdentity(None)` when the request carries no bearer token;
/// otherwise the verified introspection payload. A token that fails
/// verification rejects the request (401 or 403).
#[derive(Debug, Clone)]
pub struct DelegatedIdentity(pub Option<TokenInfo>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for DelegatedIdentity
where
    Arc<AccessGuard>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let guard = Arc::<AccessGuard>::from_ref(state);
        guard
            .verify_delegated_token(bearer_token(&parts.headers))
            .await
            .map(DelegatedIdentity)
            .map_err(AppError::from)
    }
}
