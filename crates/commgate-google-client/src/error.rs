//! Google API client error types.

/// Errors from Google API calls.
#[derive(Debug, thiserror::Error)]
pub enum GoogleApiError {
    /// HTTP transport error, including timeouts. The request URL is stripped
    /// from `source` because it carries the access token.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Google returned something other than 200.
    #[error("Google API {endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
}

impl GoogleApiError {
    /// Whether the failure happened before Google produced a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http { .. })
    }

    /// HTTP status returned by Google, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
