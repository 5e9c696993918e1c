//! Handler for the live facility status view.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use parkpass_core::category::VehicleCategory;
use parkpass_db::repositories::SpotRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /api/v1/status`.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub category: Option<String>,
}

/// GET /api/v1/status?category=
///
/// Per-zone occupancy counts from the display columns. Informational only;
/// booking decisions go through the availability query instead.
pub async fn zones(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> AppResult<impl IntoResponse> {
    let category = match &query.category {
        Some(raw) => Some(raw.parse::<VehicleCategory>().map_err(AppError::Core)?),
        None => None,
    };

    let zones = SpotRepo::zone_status(&state.pool, category.map(|c| c.as_str())).await?;
    Ok(Json(DataResponse { data: zones }))
}
