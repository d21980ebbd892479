//! # Response Schemas
//!
//! Wire types shared by the service routers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response envelope.
///
/// `data` and `error` serialize as `null` when absent; clients rely on the
/// keys always being present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl ApiResponse {
    /// Successful response carrying `data`.
    pub fn ok(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }
}

/// Health report for monitoring.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub google_services: Vec<String>,
    pub google_oauth_scopes: u32,
    pub slack_configured: bool,
}

/// The parts of a Slack Events API envelope the gateway looks at.
#[derive(Debug, Clone, Deserialize)]
pub struct SlackEventEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub event: Option<serde_json::Value>,
}

impl SlackEventEnvelope {
    /// The inner event type (`message`, `app_mention`, ...), if any.
    pub fn event_type(&self) -> Option<&str> {
        self.event.as_ref()?.get("type")?.as_str()
    }
}
