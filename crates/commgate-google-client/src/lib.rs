//! # commgate-google-client -- Typed client for the Google token-info endpoint
//!
//! The access guard in `commgate-api` validates delegated OAuth tokens by
//! introspecting them against Google:
//!
//! ```text
//! GET {base_url}/oauth2/v1/tokeninfo?access_token=<token>
//! ```
//!
//! This crate is the only place that talks to that endpoint. It makes
//! exactly one request per call: no retry, no caching. Every request is
//! bounded by [`GoogleApiConfig::timeout_secs`].
//!
//! Access tokens are passed as URL-encoded query parameters and are never
//! logged. Transport errors have the request URL stripped before they are
//! surfaced, so a token cannot leak through an error message.

pub mod config;
pub mod error;
pub mod tokeninfo;

pub use config::GoogleApiConfig;
pub use error::GoogleApiError;
pub use tokeninfo::{TokenInfo, TokenInfoClient};
