//! Typed client for `oauth2/v1/tokeninfo`.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/oauth2/v1/tokeninfo?access_token={token}` | Introspect an access token |

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::GoogleApiConfig;
use crate::error::GoogleApiError;

const TOKENINFO_PATH: &str = "oauth2/v1/tokeninfo";
const ENDPOINT: &str = "GET /oauth2/v1/tokeninfo";

/// Introspection payload returned by Google for a valid access token.
///
/// Only `email` is interpreted. Everything else Google sends (`issued_to`,
/// `audience`, `scope`, `expires_in`, ...) is kept in `claims` so callers get
/// the full payload back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub claims: serde_json::Map<String, serde_json::Value>,
}

/// Client for the Google token-info endpoint.
#[derive(Debug, Clone)]
pub struct TokenInfoClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl TokenInfoClient {
    /// Create a new client. Every request is bounded by `config.timeout_secs`.
    pub fn new(config: GoogleApiConfig) -> Result<Self, GoogleApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GoogleApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Base URL this client resolves the token-info path against.
    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    /// Introspect `access_token`.
    ///
    /// Calls `GET {base_url}/oauth2/v1/tokeninfo?access_token={token}` once.
    /// Any status other than 200 is returned as [`GoogleApiError::ApiError`].
    pub async fn tokeninfo(&self, access_token: &str) -> Result<TokenInfo, GoogleApiError> {
        let url = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            TOKENINFO_PATH
        );

        let resp = self
            .http
            .get(&url)
            .query(&[("access_token", access_token)])
            .send()
            .await
            .map_err(|e| GoogleApiError::Http {
                endpoint: ENDPOINT.into(),
                source: e.without_url(),
            })?;

        if resp.status() != reqwest::StatusCode::OK {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(status, "token introspection rejected");
            return Err(GoogleApiError::ApiError {
                endpoint: ENDPOINT.into(),
                status,
                body,
            });
        }

        resp.json().await.map_err(|e| GoogleApiError::Deserialization {
            endpoint: ENDPOINT.into(),
            source: e.without_url(),
        })
    }
}
