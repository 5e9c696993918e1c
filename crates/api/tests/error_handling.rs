//! Tests for `AppError` -> HTTP response mapping.
//!
//! These verify that each error variant produces the documented HTTP status
//! code and error code. They do not need an HTTP server; they call
//! `IntoResponse` directly on `AppError` values.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;

use parkpass_api::error::AppError;
use parkpass_core::error::CoreError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_maps_to_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "reservation",
        key: "BK00000000".into(),
    });

    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(json["error"].as_str().unwrap().contains("BK00000000"));
}

#[tokio::test]
async fn validation_maps_to_400() {
    let err = AppError::Core(CoreError::Validation("bad plate".into()));

    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "bad plate");
}

#[tokio::test]
async fn checksum_mismatch_maps_to_401() {
    let (status, json) = error_to_response(AppError::Core(CoreError::ChecksumMismatch)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "CHECKSUM_MISMATCH");
}

#[tokio::test]
async fn capacity_and_state_conflicts_map_to_409() {
    for err in [
        CoreError::NoSpotAvailable("car".into()),
        CoreError::TokenExhausted,
        CoreError::AlreadyEntered,
        CoreError::AlreadyExited,
        CoreError::NotYetEntered,
        CoreError::ReservationCancelled,
        CoreError::TerminalStateViolation("completed".into()),
    ] {
        let (status, _) = error_to_response(AppError::Core(err)).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}

#[tokio::test]
async fn unauthorized_maps_to_401() {
    let err = AppError::Unauthorized("no token provided".into());

    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn internal_error_is_sanitized() {
    let err = AppError::Core(CoreError::Internal("secret connection string".into()));

    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert!(
        !json.to_string().contains("secret"),
        "Internal error response must not leak details"
    );
    assert_eq!(json["error"], "An internal error occurred");
}
