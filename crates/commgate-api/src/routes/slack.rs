//! Slack router, mounted at `/slack`.
//!
//! `/test` sits behind the API key. `/events` is called by Slack itself and
//! sits behind request-signature verification instead.

use axum::body::Bytes;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde_json::json;

use crate::auth::{require_slack_signature, ApiKey, SignatureOutcome};
use crate::error::ErrorBody;
use crate::models::{ApiResponse, SlackEventEnvelope};
use crate::routes::meta::SLACK_WORKSPACE;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    let webhooks = Router::new()
        .route("/events", post(receive_event))
        .route_layer(from_fn_with_state(state, require_slack_signature));

    Router::new()
        .route("/test", get(test_slack_connection))
        .merge(webhooks)
}

/// GET /slack/test: Confirm the Slack router is loaded.
#[utoipa::path(
    get,
    path = "/slack/test",
    responses(
        (status = 200, description = "Router loaded", body = ApiResponse),
        (status = 403, description = "Missing or invalid API key", body = ErrorBody),
        (status = 500, description = "API keys not configured", body = ErrorBody),
    ),
    security(("HTTPBearer" = [])),
    tag = "slack"
)]
pub(crate) async fn test_slack_connection(_key: ApiKey) -> Json<ApiResponse> {
    Json(ApiResponse::ok(
        "Slack router is loaded",
        json!({
            "note": "Full implementation includes messaging, channels, users, and files",
            "workspace": SLACK_WORKSPACE,
        }),
    ))
}

/// POST /slack/events: Acknowledge a signed Slack event.
#[utoipa::path(
    post,
    path = "/slack/events",
    request_body(content = String, description = "Raw Slack event payload", content_type = "application/json"),
    params(
        ("X-Slack-Request-Timestamp" = String, Header, description = "Unix time the request was signed"),
        ("X-Slack-Signature" = String, Header, description = "v0=<hex HMAC-SHA256>"),
    ),
    responses(
        (status = 200, description = "Event acknowledged", body = ApiResponse),
        (status = 401, description = "Signature rejected", body = ErrorBody),
    ),
    tag = "slack"
)]
pub(crate) async fn receive_event(
    Extension(outcome): Extension<SignatureOutcome>,
    body: Bytes,
) -> Json<ApiResponse> {
    let envelope = serde_json::from_slice::<SlackEventEnvelope>(&body).ok();
    let kind = envelope.as_ref().map(|e| e.kind.as_str());
    let event_type = envelope.as_ref().and_then(|e| e.event_type());

    tracing::info!(
        kind = kind.unwrap_or("unknown"),
        event_type = event_type.unwrap_or("none"),
        verification = outcome.as_str(),
        "Slack event received"
    );

    Json(ApiResponse::ok(
        "Slack event received",
        json!({
            "type": kind,
            "event_type": event_type,
            "verification": outcome.as_str(),
        }),
    ))
}
