//! Integration tests for the gate checkpoint endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, book, get, get_auth, post_json};
use sqlx::SqlitePool;

const START: &str = "2025-10-28T10:00:00Z";
const END: &str = "2025-10-28T12:00:00Z";

async fn booked_pass(pool: &SqlitePool) -> String {
    let data = book(
        common::build_test_app(pool.clone()),
        1,
        "car",
        "GJ 03 AY 1097",
        START,
        END,
    )
    .await;
    data["pass_token"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Test: entry then exit through the HTTP surface
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn entry_then_exit_round_trip(pool: SqlitePool) {
    let pass = booked_pass(&pool).await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/gate/entry",
        serde_json::json!({ "pass": pass }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["authorized"], true);
    assert_eq!(json["data"]["gate"], "entry");
    assert_eq!(json["data"]["spot_number"], "CA01");

    // Exiting right after entering is well inside the booked duration.
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/gate/exit",
        serde_json::json!({ "pass": pass }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["authorized"], true);
    assert_eq!(json["data"]["gate"], "exit");
    assert_eq!(json["data"]["overstay"], false);
    assert_eq!(json["data"]["surcharge"], 0);
}

// ---------------------------------------------------------------------------
// Test: second entry scan conflicts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn double_entry_returns_409(pool: SqlitePool) {
    let pass = booked_pass(&pool).await;

    post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/gate/entry",
        serde_json::json!({ "pass": pass }),
    )
    .await;

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/gate/entry",
        serde_json::json!({ "pass": pass }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "ALREADY_ENTERED");
}

// ---------------------------------------------------------------------------
// Test: exit before entry conflicts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn exit_before_entry_returns_409(pool: SqlitePool) {
    let pass = booked_pass(&pool).await;

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/gate/exit",
        serde_json::json!({ "pass": pass }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_YET_ENTERED");
}

// ---------------------------------------------------------------------------
// Test: tampered pass is unauthorized, garbage is malformed
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn bad_passes_are_rejected(pool: SqlitePool) {
    let pass = booked_pass(&pool).await;
    let tampered = pass.replace("GJ 03 AY 1097", "MH 99 XX 0001");

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/gate/entry",
        serde_json::json!({ "pass": tampered }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CHECKSUM_MISMATCH");

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/gate/entry",
        serde_json::json!({ "pass": "not a pass at all" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "MALFORMED_PASS");
}

// ---------------------------------------------------------------------------
// Test: scan history records authorized and denied scans
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn scan_history_includes_denied_scans(pool: SqlitePool) {
    let pass = booked_pass(&pool).await;

    post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/gate/entry",
        serde_json::json!({ "pass": pass }),
    )
    .await;
    // Denied: second entry with the same pass.
    post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/gate/entry",
        serde_json::json!({ "pass": pass }),
    )
    .await;

    let response = get(common::build_test_app(pool), "/api/v1/gate/scans?limit=10").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let scans = json["data"].as_array().unwrap();
    assert_eq!(scans.len(), 2);
    // Newest first: the denied scan leads.
    assert_eq!(scans[0]["authorized"], false);
    assert_eq!(scans[1]["authorized"], true);
}

// ---------------------------------------------------------------------------
// Test: the ledger shows the booking charge and total
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn transactions_list_the_booking_charge(pool: SqlitePool) {
    booked_pass(&pool).await;

    let response = get_auth(common::build_test_app(pool), "/api/v1/transactions", 1).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let entries = json["data"]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["kind"], "booking");
    assert_eq!(entries[0]["amount"], 60);
    assert!(entries[0]["code"].as_str().unwrap().starts_with("TXN"));
    assert_eq!(json["data"]["total_spent"], 60);
}
