//! # OpenAPI Document
//!
//! Collects the utoipa-annotated handlers into one OpenAPI 3 document,
//! served at `/openapi.json` and exported by the `commgate-openapi` binary.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

pub const API_TITLE: &str = "User Communication & Account Tools API (Extended)";

/// Name of the bearer scheme referenced by the guarded operations.
pub const SECURITY_SCHEME: &str = "HTTPBearer";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Communication & Account Tools API (Extended)",
        version = "2.0.0",
        description = "Gateway for Google Workspace (14 services) and Slack. Service routes require an API key sent as `Authorization: Bearer <key>`; Slack webhooks are authenticated by request signature.",
        license(name = "BUSL-1.1")
    ),
    servers(
        (url = "http://localhost:8000", description = "Development server"),
        (url = "https://user-api.worklocal.ca", description = "Production server"),
    ),
    paths(
        crate::routes::meta::read_root,
        crate::routes::meta::health_check,
        crate::routes::meta::api_info,
        crate::routes::google::test_google_connection,
        crate::routes::google::token_info,
        crate::routes::slack::test_slack_connection,
        crate::routes::slack::receive_event,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::models::ApiResponse,
        crate::models::HealthResponse,
    )),
    modifiers(&BearerSecurity),
    tags(
        (name = "health", description = "Service status"),
        (name = "info", description = "Service catalogue"),
        (name = "google", description = "Google Workspace services"),
        (name = "slack", description = "Slack workspace services"),
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            SECURITY_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("API key authentication"))
                    .build(),
            ),
        );
    }
}

/// Serves the document at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
