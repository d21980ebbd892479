//! Unauthenticated service metadata: `/`, `/health`, `/info`.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::models::HealthResponse;
use crate::state::AppState;

pub const SERVICE_NAME: &str = "User Communication & Account Tools API";
pub const API_VERSION: &str = "2.0.0";
/// Version reported by the `/` banner, which has not tracked `API_VERSION`.
pub const BANNER_VERSION: &str = "1.0.0";
pub const SLACK_WORKSPACE: &str = "localmediaconcepts.slack.com";
pub const GOOGLE_OAUTH_SCOPE_COUNT: u32 = 28;

pub const GOOGLE_SERVICES: [&str; 14] = [
    "gmail", "calendar", "drive", "sheets", "docs", "slides", "forms", "tasks", "keep",
    "contacts", "directory", "youtube", "photos", "chat",
];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(read_root))
        .route("/health", get(health_check))
        .route("/info", get(api_info))
}

/// GET /: Service banner.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner")),
    tag = "health"
)]
pub(crate) async fn read_root() -> Json<Value> {
    Json(json!({
        "status": "active",
        "service": SERVICE_NAME,
        "version": BANNER_VERSION,
        "endpoints": {
            "google": "/google",
            "slack": "/slack",
            "openapi": "/openapi.json"
        }
    }))
}

/// GET /health: Health check for monitoring.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse)),
    tag = "health"
)]
pub(crate) async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "user-api".to_string(),
        version: API_VERSION.to_string(),
        google_services: GOOGLE_SERVICES.iter().map(|s| s.to_string()).collect(),
        google_oauth_scopes: GOOGLE_OAUTH_SCOPE_COUNT,
        slack_configured: state.slack_bot_configured,
    })
}

/// GET /info: API information and service catalogue.
#[utoipa::path(
    get,
    path = "/info",
    responses((status = 200, description = "API information")),
    tag = "info"
)]
pub(crate) async fn api_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "title": crate::openapi::API_TITLE,
        "version": API_VERSION,
        "user": state.guard.allowed_email(),
        "slack_workspace": SLACK_WORKSPACE,
        "available_services": {
            "google": {
                "gmail": "Email management (full access: send, read, modify, labels)",
                "calendar": "Calendar events and scheduling",
                "drive": "File storage and management (full access)",
                "sheets": "Spreadsheet operations",
                "docs": "Document management",
                "slides": "Presentation management",
                "forms": "Form creation and responses",
                "tasks": "Task lists and task management",
                "keep": "Notes management",
                "contacts": "Contact management",
                "directory": "Workspace user and group directory",
                "youtube": "YouTube channel and video data",
                "photos": "Photo library access",
                "chat": "Google Chat messaging (bot, spaces, messages)"
            },
            "slack": {
                "messages": "Send and receive messages",
                "channels": "Channel management",
                "users": "User information",
                "files": "File sharing"
            }
        },
        "oauth_scopes": {
            "count": GOOGLE_OAUTH_SCOPE_COUNT,
            "categories": [
                "Gmail (5 scopes)",
                "Calendar (2 scopes)",
                "Drive (4 scopes)",
                "Productivity (4 scopes)",
                "Communication (3 scopes)",
                "Directory & Contacts (4 scopes)",
                "Additional Services (6 scopes)"
            ]
        },
        "signature_verification": state.guard.signature_verification_enabled()
    }))
}
