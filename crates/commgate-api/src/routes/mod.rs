//! # API Route Modules
//!
//! - `meta`: unauthenticated banner, health and info endpoints.
//! - `google`: Google Workspace router, mounted at `/google`.
//! - `slack`: Slack router, mounted at `/slack`.
//!
//! The service routers are acknowledgement stubs; the Google and Slack APIs
//! themselves are reached elsewhere. What they demonstrate is which guard
//! each kind of endpoint sits behind.

pub mod google;
pub mod meta;
pub mod slack;
