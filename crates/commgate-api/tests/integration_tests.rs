//! Integration tests for the full gateway router.
//!
//! Requests go through `commgate_api::app` with `tower::ServiceExt::oneshot`,
//! so guards, error mapping and routing are exercised together.

use std::collections::HashMap;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use commgate_api::auth::{
    compute_signature, MAX_SIGNED_BODY_BYTES, SLACK_SIGNATURE_HEADER, SLACK_TIMESTAMP_HEADER,
};
use commgate_api::config::AppConfig;
use commgate_api::state::AppState;

const SIGNING_SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";

fn app_with(vars: &[(&str, &str)]) -> axum::Router {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let config = AppConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
    commgate_api::app(AppState::new(config).unwrap())
}

fn default_app() -> axum::Router {
    app_with(&[
        ("API_KEYS", "alpha-key,beta-key"),
        ("SLACK_SIGNING_SECRET", SIGNING_SECRET),
        ("SLACK_BOT_TOKEN", "xoxb-test"),
    ])
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn signed_event(body: &str, timestamp: i64, secret: &str) -> Request<Body> {
    let ts = timestamp.to_string();
    let signature = compute_signature(secret.as_bytes(), &ts, body).unwrap();
    Request::builder()
        .method("POST")
        .uri("/slack/events")
        .header(header::CONTENT_TYPE, "application/json")
        .header(SLACK_TIMESTAMP_HEADER, ts)
        .header(SLACK_SIGNATURE_HEADER, signature)
        .body(Body::from(body.to_string()))
        .unwrap()
}

const EVENT: &str = r#"{"type":"event_callback","team_id":"T1","event":{"type":"message","text":"hi"}}"#;

// -- Unauthenticated endpoints -------------------------------------------------

#[tokio::test]
async fn root_reports_active_without_credentials() {
    let response = default_app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "active");
    assert_eq!(json["version"], "1.0.0");
    assert_eq!(json["endpoints"]["google"], "/google");
}

#[tokio::test]
async fn health_reports_services_and_slack_status() {
    let response = default_app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["google_services"].as_array().unwrap().len(), 14);
    assert_eq!(json["google_oauth_scopes"], 28);
    assert_eq!(json["slack_configured"], true);

    let bare = app_with(&[]).oneshot(get("/health")).await.unwrap();
    assert_eq!(body_json(bare).await["slack_configured"], false);
}

#[tokio::test]
async fn info_names_the_allowed_user() {
    let app = app_with(&[("GOOGLE_USER_EMAIL", "ops@example.com")]);
    let json = body_json(app.oneshot(get("/info")).await.unwrap()).await;
    assert_eq!(json["user"], "ops@example.com");
    assert_eq!(json["title"], "User Communication & Account Tools API (Extended)");
    assert_eq!(json["version"], "2.0.0");
    assert_eq!(json["signature_verification"], false);
    assert!(json["available_services"]["google"]["gmail"].is_string());
}

#[tokio::test]
async fn unknown_route_is_404_with_detail() {
    let response = default_app().oneshot(get("/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["detail"], "Not Found");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let response = default_app().oneshot(get("/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json["info"]["title"],
        "User Communication & Account Tools API (Extended)"
    );
    assert!(json["paths"]["/slack/events"]["post"].is_object());
}

// -- API key guard -------------------------------------------------------------

#[tokio::test]
async fn api_key_routes_accept_each_configured_key() {
    for key in ["alpha-key", "beta-key"] {
        for uri in ["/google/test", "/slack/test"] {
            let response = default_app()
                .oneshot(get_with_bearer(uri, key))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri} with {key}");
            let json = body_json(response).await;
            assert_eq!(json["success"], true);
            assert!(json["error"].is_null());
        }
    }
}

#[tokio::test]
async fn missing_authorization_is_403_not_authenticated() {
    let response = default_app().oneshot(get("/google/test")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["detail"], "Not authenticated");
}

#[tokio::test]
async fn wrong_key_is_403_invalid_api_key() {
    let response = default_app()
        .oneshot(get_with_bearer("/slack/test", "alpha-ke"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["detail"], "Invalid API key");
}

#[tokio::test]
async fn non_bearer_scheme_is_invalid_credentials() {
    let request = Request::builder()
        .uri("/google/test")
        .header(header::AUTHORIZATION, "Basic YWxwaGEta2V5")
        .body(Body::empty())
        .unwrap();
    let response = default_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await["detail"],
        "Invalid authentication credentials"
    );
}

#[tokio::test]
async fn unconfigured_keys_fail_closed_with_500() {
    let app = app_with(&[("API_KEYS", " , ")]);
    let response = app
        .oneshot(get_with_bearer("/google/test", "anything"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["detail"],
        "API keys not configured on server"
    );
}

#[tokio::test]
async fn keys_are_trimmed_when_loaded() {
    let app = app_with(&[("API_KEYS", "  padded-key  ,other")]);
    let response = app
        .oneshot(get_with_bearer("/google/test", "padded-key"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// -- Slack signature guard -----------------------------------------------------

#[tokio::test]
async fn signed_event_is_acknowledged() {
    let now = chrono::Utc::now().timestamp();
    let response = default_app()
        .oneshot(signed_event(EVENT, now, SIGNING_SECRET))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["type"], "event_callback");
    assert_eq!(json["data"]["event_type"], "message");
    assert_eq!(json["data"]["verification"], "verified");
}

#[tokio::test]
async fn event_signed_with_other_secret_is_401() {
    let now = chrono::Utc::now().timestamp();
    let response = default_app()
        .oneshot(signed_event(EVENT, now, "not-the-secret"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["detail"],
        "Invalid Slack request signature"
    );
}

#[tokio::test]
async fn stale_event_is_401() {
    let ten_minutes_ago = chrono::Utc::now().timestamp() - 600;
    let response = default_app()
        .oneshot(signed_event(EVENT, ten_minutes_ago, SIGNING_SECRET))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn event_without_signature_headers_is_401() {
    let request = Request::builder()
        .method("POST")
        .uri("/slack/events")
        .body(Body::from(EVENT))
        .unwrap();
    let response = default_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn oversized_signed_body_is_413() {
    let now = chrono::Utc::now().timestamp();
    let body = "a".repeat(MAX_SIGNED_BODY_BYTES + 1);
    let response = default_app()
        .oneshot(signed_event(&body, now, SIGNING_SECRET))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let detail = body_json(response).await["detail"].clone();
    assert!(detail.as_str().unwrap().contains("exceeds"));
}

#[tokio::test]
async fn signed_body_at_the_limit_is_buffered() {
    let now = chrono::Utc::now().timestamp();
    let body = "a".repeat(MAX_SIGNED_BODY_BYTES);
    let response = default_app()
        .oneshot(signed_event(&body, now, SIGNING_SECRET))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["verification"], "verified");
}

#[tokio::test]
async fn events_pass_unverified_when_secret_unset() {
    let app = app_with(&[("API_KEYS", "alpha-key")]);
    let request = Request::builder()
        .method("POST")
        .uri("/slack/events")
        .body(Body::from(EVENT))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["data"]["verification"],
        "bypass_unconfigured"
    );
}

#[tokio::test]
async fn slack_events_does_not_require_api_key() {
    // The signature guard replaces the API key on the webhook route.
    let now = chrono::Utc::now().timestamp();
    let mut request = signed_event(EVENT, now, SIGNING_SECRET);
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, "Bearer wrong".parse().unwrap());
    let response = default_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// -- Delegated Google token ----------------------------------------------------

async fn app_against(google: &MockServer) -> axum::Router {
    let base = google.uri();
    app_with(&[
        ("API_KEYS", "alpha-key"),
        ("GOOGLE_USER_EMAIL", "owner@example.com"),
        ("GOOGLE_API_BASE_URL", base.as_str()),
    ])
}

#[tokio::test]
async fn tokeninfo_without_token_returns_null_data() {
    let google = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&google)
        .await;

    let response = app_against(&google)
        .await
        .oneshot(get("/google/tokeninfo"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert!(json["data"].is_null());
}

#[tokio::test]
async fn tokeninfo_returns_payload_for_allowed_user() {
    let google = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/v1/tokeninfo"))
        .and(query_param("access_token", "ya29.good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "email": "owner@example.com",
            "scope": "https://www.googleapis.com/auth/gmail.readonly",
            "expires_in": 3599
        })))
        .expect(1)
        .mount(&google)
        .await;

    let response = app_against(&google)
        .await
        .oneshot(get_with_bearer("/google/tokeninfo", "ya29.good"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "owner@example.com");
    assert_eq!(json["data"]["expires_in"], 3599);
}

#[tokio::test]
async fn tokeninfo_for_other_user_is_403() {
    let google = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/v1/tokeninfo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"email": "intruder@example.com"})),
        )
        .mount(&google)
        .await;

    let response = app_against(&google)
        .await
        .oneshot(get_with_bearer("/google/tokeninfo", "ya29.other"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await["detail"],
        "Token not authorized for this user"
    );
}

#[tokio::test]
async fn tokeninfo_with_blank_allowed_email_is_403() {
    let google = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/v1/tokeninfo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"email": "james@worklocal.ca"})),
        )
        .mount(&google)
        .await;

    let base = google.uri();
    let app = app_with(&[
        ("GOOGLE_USER_EMAIL", ""),
        ("GOOGLE_API_BASE_URL", base.as_str()),
    ]);
    let response = app
        .oneshot(get_with_bearer("/google/tokeninfo", "ya29.default-user"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn tokeninfo_rejected_by_google_is_401() {
    let google = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/v1/tokeninfo"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_token",
                "error_description": "Invalid Value"
            })),
        )
        .mount(&google)
        .await;

    let response = app_against(&google)
        .await
        .oneshot(get_with_bearer("/google/tokeninfo", "ya29.expired"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["detail"],
        "Invalid Google OAuth token"
    );
}
