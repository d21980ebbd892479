//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Bodies follow the FastAPI convention the existing clients already parse:
//!
//! ```json
//! {"detail": "Invalid API key"}
//! ```
//!
//! Internal error details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::auth::AuthError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub detail: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body could not be read or parsed (400).
    #[error("{0}")]
    BadRequest(String),

    /// Missing or invalid credential (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Credential understood but refused (403).
    #[error("{0}")]
    Forbidden(String),

    /// No such route (404).
    #[error("{0}")]
    NotFound(String),

    /// Request body over the buffering limit (413).
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Required server configuration is absent (500). The message is meant
    /// for operators and is returned as-is.
    #[error("{0}")]
    Misconfigured(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Misconfigured(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let detail = match &self {
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

/// Client-facing wording for guard rejections.
///
/// Signature failures share one message; the specific reason is logged
/// by the middleware so senders cannot learn which check failed.
impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => Self::Forbidden("Not authenticated".into()),
            AuthError::UnsupportedScheme => {
                Self::Forbidden("Invalid authentication credentials".into())
            }
            AuthError::ServerMisconfigured => {
                Self::Misconfigured("API keys not configured on server".into())
            }
            AuthError::InvalidCredential => Self::Forbidden("Invalid API key".into()),
            AuthError::InvalidToken => Self::Unauthorized("Invalid Google OAuth token".into()),
            AuthError::IdentityNotAuthorized => {
                Self::Forbidden("Token not authorized for this user".into())
            }
            AuthError::MalformedSignedRequest(_)
            | AuthError::StaleRequest
            | AuthError::SignatureMismatch => {
                Self::Unauthorized("Invalid Slack request signature".into())
            }
        }
    }
}
