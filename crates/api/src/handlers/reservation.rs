//! Handlers for booking, inspecting, extending, and cancelling
//! reservations, plus the public availability query.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use parkpass_core::category::VehicleCategory;
use parkpass_core::error::CoreError;
use parkpass_core::interval::Interval;
use parkpass_core::types::{Money, Timestamp};
use parkpass_db::models::{Reservation, Spot};
use parkpass_db::repositories::{ReservationRepo, SpotRepo};
use parkpass_db::{allocator, DbPool};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthOwner;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /api/v1/reservations`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReservationRequest {
    pub category: String,
    #[validate(length(min = 4, max = 20))]
    pub vehicle_number: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

/// Request body for `POST /api/v1/reservations/{code}/extend`.
#[derive(Debug, Deserialize)]
pub struct ExtendRequest {
    pub new_end_time: Timestamp,
}

/// Reservation detail including the allocated spot and the gate pass.
#[derive(Debug, Serialize)]
pub struct ReservationDetail {
    pub code: String,
    pub category: String,
    pub vehicle_number: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub actual_entry_time: Option<Timestamp>,
    pub actual_exit_time: Option<Timestamp>,
    pub state: String,
    pub amount: Money,
    pub scan_count: i64,
    pub spot_number: Option<String>,
    pub pass_token: String,
    pub created_at: Timestamp,
}

impl ReservationDetail {
    fn new(reservation: Reservation, spot: Option<Spot>) -> Self {
        Self {
            code: reservation.code,
            category: reservation.category,
            vehicle_number: reservation.vehicle_number,
            start_time: reservation.start_time,
            end_time: reservation.end_time,
            actual_entry_time: reservation.actual_entry_time,
            actual_exit_time: reservation.actual_exit_time,
            state: reservation.state,
            amount: reservation.amount,
            scan_count: reservation.scan_count,
            spot_number: spot.map(|s| s.spot_number),
            pass_token: reservation.pass_token,
            created_at: reservation.created_at,
        }
    }
}

/// Load the spot referenced by a reservation, if any.
async fn spot_of(pool: &DbPool, reservation: &Reservation) -> AppResult<Option<Spot>> {
    Ok(match reservation.spot_id {
        Some(spot_id) => SpotRepo::find_by_id(pool, spot_id).await?,
        None => None,
    })
}

/// POST /api/v1/reservations
///
/// Book a spot for a time window, charging the whole window up front and
/// minting the gate pass.
pub async fn create(
    owner: AuthOwner,
    State(state): State<AppState>,
    Json(input): Json<CreateReservationRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let category: VehicleCategory = input.category.parse().map_err(AppError::Core)?;
    let interval = Interval::new(input.start_time, input.end_time).map_err(AppError::Core)?;

    let reservation = allocator::book(
        &state.pool,
        owner.owner_id,
        category,
        &input.vehicle_number,
        interval,
        chrono::Utc::now(),
        &state.config.gate.pass_secret,
    )
    .await?;

    let spot = spot_of(&state.pool, &reservation).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ReservationDetail::new(reservation, spot),
        }),
    ))
}

/// GET /api/v1/reservations
///
/// All of the authenticated owner's reservations, newest first.
pub async fn list(
    owner: AuthOwner,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let reservations = ReservationRepo::list_for_owner(&state.pool, owner.owner_id).await?;
    Ok(Json(DataResponse { data: reservations }))
}

/// GET /api/v1/reservations/{code}
pub async fn get_by_code(
    owner: AuthOwner,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<impl IntoResponse> {
    let reservation = ReservationRepo::find_for_owner(&state.pool, &code, owner.owner_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "reservation",
            key: code,
        }))?;

    let spot = spot_of(&state.pool, &reservation).await?;
    Ok(Json(DataResponse {
        data: ReservationDetail::new(reservation, spot),
    }))
}

/// Response body for a successful extension.
#[derive(Debug, Serialize)]
pub struct ExtendResponse {
    pub code: String,
    pub new_end_time: Timestamp,
    pub additional_cost: Money,
    pub amount: Money,
}

/// POST /api/v1/reservations/{code}/extend
///
/// Push the scheduled exit later, charging for the added hours.
pub async fn extend(
    owner: AuthOwner,
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(input): Json<ExtendRequest>,
) -> AppResult<impl IntoResponse> {
    let before = ReservationRepo::find_for_owner(&state.pool, &code, owner.owner_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "reservation",
            key: code.clone(),
        }))?;

    let after = allocator::extend(&state.pool, owner.owner_id, &code, input.new_end_time).await?;

    Ok(Json(DataResponse {
        data: ExtendResponse {
            code: after.code,
            new_end_time: after.end_time,
            additional_cost: after.amount - before.amount,
            amount: after.amount,
        },
    }))
}

/// POST /api/v1/reservations/{code}/cancel
///
/// Cancel an unused booking. The booking charge is not refunded.
pub async fn cancel(
    owner: AuthOwner,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<impl IntoResponse> {
    let reservation = allocator::cancel(&state.pool, owner.owner_id, &code).await?;
    Ok(Json(DataResponse { data: reservation }))
}

/// Query parameters for `GET /api/v1/availability`.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub category: String,
    pub from: Timestamp,
    pub to: Timestamp,
}

/// Response body for the availability query.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub category: VehicleCategory,
    pub from: Timestamp,
    pub to: Timestamp,
    pub available: i64,
}

/// GET /api/v1/availability?category=&from=&to=
///
/// Free capacity of a category over a window. Public: no owner identity
/// required to check before booking.
pub async fn availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<impl IntoResponse> {
    let category: VehicleCategory = query.category.parse().map_err(AppError::Core)?;
    let interval = Interval::new(query.from, query.to).map_err(AppError::Core)?;

    let available = allocator::available(&state.pool, category, interval).await?;

    Ok(Json(DataResponse {
        data: AvailabilityResponse {
            category,
            from: query.from,
            to: query.to,
            available,
        },
    }))
}
