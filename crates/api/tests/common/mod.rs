//! Shared helpers for API integration tests.
//!
//! Builds the application with the production router so every test
//! exercises the real middleware stack (CORS, request ID, timeout, tracing,
//! panic recovery).

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

use parkpass_api::auth::jwt::{generate_access_token, JwtConfig};
use parkpass_api::config::{GateConfig, ServerConfig};
use parkpass_api::router::build_app_router;
use parkpass_api::state::AppState;
use parkpass_core::billing::OverstayPolicy;
use parkpass_core::types::DbId;

/// Gate-pass secret shared by all tests.
pub const PASS_SECRET: &str = "test-gate-pass-secret";

/// Build a test `ServerConfig` with safe defaults and known secrets.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        gate: GateConfig {
            pass_secret: PASS_SECRET.to_string(),
            exit_policy: OverstayPolicy::BookedDuration,
        },
        jwt: JwtConfig {
            secret: "test-jwt-secret-that-is-long-enough".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router over the given pool.
pub fn build_test_app(pool: SqlitePool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Bearer token for the given owner, signed with the test JWT secret.
pub fn bearer(owner_id: DbId) -> String {
    let token = generate_access_token(owner_id, &test_config().jwt)
        .expect("token generation should succeed");
    format!("Bearer {token}")
}

/// Issue a GET request without authentication.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request should build"),
    )
    .await
    .expect("request should complete")
}

/// Issue a GET request with a Bearer token for `owner_id`.
pub async fn get_auth(app: Router, uri: &str, owner_id: DbId) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .header("authorization", bearer(owner_id))
            .body(Body::empty())
            .expect("request should build"),
    )
    .await
    .expect("request should complete")
}

/// Issue an unauthenticated POST with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build"),
    )
    .await
    .expect("request should complete")
}

/// Issue an authenticated POST with a JSON body.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    owner_id: DbId,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", bearer(owner_id))
            .body(Body::from(body.to_string()))
            .expect("request should build"),
    )
    .await
    .expect("request should complete")
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Book a reservation over HTTP and return the `data` payload.
pub async fn book(
    app: Router,
    owner_id: DbId,
    category: &str,
    vehicle_number: &str,
    start: &str,
    end: &str,
) -> serde_json::Value {
    let response = post_json_auth(
        app,
        "/api/v1/reservations",
        owner_id,
        serde_json::json!({
            "category": category,
            "vehicle_number": vehicle_number,
            "start_time": start,
            "end_time": end,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}
