//! # commgate-api: Communication Gateway
//!
//! Axum service that fronts Google Workspace and Slack behind a single
//! access guard.
//!
//! ## API Surface
//!
//! | Route                  | Guard                          |
//! |------------------------|--------------------------------|
//! | `/`, `/health`, `/info`| none                           |
//! | `/openapi.json`        | none                           |
//! | `GET /google/test`     | API key ([`auth::ApiKey`])     |
//! | `GET /google/tokeninfo`| delegated Google token         |
//! | `GET /slack/test`      | API key                        |
//! | `POST /slack/events`   | Slack request signature        |
//!
//! Every error leaves as `{"detail": "..."}`; see [`error::AppError`].

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Assemble the full application router.
///
/// Guards are attached per route through extractors and a route layer, so
/// the unauthenticated endpoints need no special mounting.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::meta::router())
        .nest("/google", routes::google::router())
        .nest("/slack", routes::slack::router(state.clone()))
        .merge(openapi::router())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("Not Found".to_string())
}
