//! Handlers for the gate checkpoints.
//!
//! Entry and exit are device-facing: the scanner posts the raw pass it
//! read. Denied scans surface as JSON errors with conflict status codes and
//! are also recorded in the scan log when the reservation was identifiable.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use parkpass_core::pass;
use parkpass_core::types::Money;
use parkpass_db::gate::{self, ScanResult};
use parkpass_db::models::Spot;
use parkpass_db::repositories::{GateScanRepo, SpotRepo};
use parkpass_db::DbPool;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default and maximum page sizes for the scan history.
const DEFAULT_SCAN_LIMIT: i64 = 50;
const MAX_SCAN_LIMIT: i64 = 200;

/// Request body posted by a gate scanner.
#[derive(Debug, Deserialize)]
pub struct GatePassRequest {
    /// The raw pass payload exactly as scanned.
    pub pass: String,
}

/// Response body for an authorized scan.
#[derive(Debug, Serialize)]
pub struct GateResponse {
    pub authorized: bool,
    pub gate: String,
    pub code: String,
    pub vehicle_number: String,
    pub spot_number: Option<String>,
    pub overstay: bool,
    pub surcharge: Money,
    pub message: String,
}

impl GateResponse {
    fn new(result: ScanResult, spot: Option<Spot>) -> Self {
        Self {
            authorized: result.scan.authorized,
            gate: result.scan.gate_type,
            code: result.reservation.code,
            vehicle_number: result.reservation.vehicle_number,
            spot_number: spot.map(|s| s.spot_number),
            overstay: result.scan.overstay,
            surcharge: result.scan.surcharge,
            message: result.scan.reason,
        }
    }
}

async fn spot_of(pool: &DbPool, result: &ScanResult) -> AppResult<Option<Spot>> {
    Ok(match result.reservation.spot_id {
        Some(spot_id) => SpotRepo::find_by_id(pool, spot_id).await?,
        None => None,
    })
}

/// POST /api/v1/gate/entry
pub async fn entry(
    State(state): State<AppState>,
    Json(input): Json<GatePassRequest>,
) -> AppResult<impl IntoResponse> {
    let claims = pass::decode(&input.pass, &state.config.gate.pass_secret)?;
    let result = gate::scan_entry(&state.pool, &claims, chrono::Utc::now()).await?;

    let spot = spot_of(&state.pool, &result).await?;
    Ok(Json(DataResponse {
        data: GateResponse::new(result, spot),
    }))
}

/// POST /api/v1/gate/exit
pub async fn exit(
    State(state): State<AppState>,
    Json(input): Json<GatePassRequest>,
) -> AppResult<impl IntoResponse> {
    let claims = pass::decode(&input.pass, &state.config.gate.pass_secret)?;
    let result = gate::scan_exit(
        &state.pool,
        &claims,
        state.config.gate.exit_policy,
        chrono::Utc::now(),
    )
    .await?;

    let spot = spot_of(&state.pool, &result).await?;
    Ok(Json(DataResponse {
        data: GateResponse::new(result, spot),
    }))
}

/// Query parameters for the scan history.
#[derive(Debug, Deserialize)]
pub struct ScanHistoryQuery {
    pub limit: Option<i64>,
}

/// GET /api/v1/gate/scans?limit=
///
/// Most recent scan events across both gates, authorized and denied.
pub async fn scans(
    State(state): State<AppState>,
    Query(query): Query<ScanHistoryQuery>,
) -> AppResult<impl IntoResponse> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_SCAN_LIMIT)
        .clamp(1, MAX_SCAN_LIMIT);
    let scans = GateScanRepo::list_recent(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: scans }))
}
