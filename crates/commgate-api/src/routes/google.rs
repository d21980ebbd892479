//! Google Workspace router, mounted at `/google`.

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::auth::{ApiKey, DelegatedIdentity};
use crate::error::{AppError, ErrorBody};
use crate::models::ApiResponse;
use crate::routes::meta::GOOGLE_SERVICES;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/test", get(test_google_connection))
        .route("/tokeninfo", get(token_info))
}

/// GET /google/test: Confirm the Google router is loaded.
#[utoipa::path(
    get,
    path = "/google/test",
    responses(
        (status = 200, description = "Router loaded", body = ApiResponse),
        (status = 403, description = "Missing or invalid API key", body = ErrorBody),
        (status = 500, description = "API keys not configured", body = ErrorBody),
    ),
    security(("HTTPBearer" = [])),
    tag = "google"
)]
pub(crate) async fn test_google_connection(_key: ApiKey) -> Json<ApiResponse> {
    Json(ApiResponse::ok(
        "Google services router is loaded",
        json!({
            "note": "Full implementation includes all 14 Google services",
            "services": GOOGLE_SERVICES,
        }),
    ))
}

/// GET /google/tokeninfo: Introspect the caller's delegated Google token.
///
/// The bearer token is optional. Without one, `data` is `null`.
#[utoipa::path(
    get,
    path = "/google/tokeninfo",
    responses(
        (status = 200, description = "Verified token payload, or null without a token", body = ApiResponse),
        (status = 401, description = "Google rejected the token", body = ErrorBody),
        (status = 403, description = "Token belongs to another user", body = ErrorBody),
    ),
    security((), ("HTTPBearer" = [])),
    tag = "google"
)]
pub(crate) async fn token_info(
    DelegatedIdentity(info): DelegatedIdentity,
) -> Result<Json<ApiResponse>, AppError> {
    let (message, data) = match info {
        Some(info) => (
            "Google OAuth token verified",
            serde_json::to_value(info)
                .map_err(|e| AppError::Internal(format!("encoding token info: {e}")))?,
        ),
        None => ("No Google OAuth token presented", serde_json::Value::Null),
    };
    Ok(Json(ApiResponse {
        success: true,
        message: message.to_string(),
        data: Some(data),
        error: None,
    }))
}
