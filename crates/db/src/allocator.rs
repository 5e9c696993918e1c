//! Reservation allocation engine.
//!
//! Every mutating operation runs inside a single transaction so the capacity
//! check, the spot pick, and the writes are atomic. Two concurrent bookings
//! racing for the last spot serialize on the writer; the loser's write comes
//! back busy, the operation is retried once, and the re-run's capacity check
//! observes the committed winner and fails cleanly with `NoSpotAvailable`.

use rand::Rng;
use tracing::info;

use parkpass_core::category::VehicleCategory;
use parkpass_core::error::CoreError;
use parkpass_core::interval::Interval;
use parkpass_core::pass;
use parkpass_core::plate;
use parkpass_core::types::{DbId, Timestamp};

use crate::models::reservation::{CreateReservation, Reservation};
use crate::models::spot::SPOT_RESERVED;
use crate::models::transaction::{CreateTransaction, KIND_BOOKING, KIND_EXTENSION};
use crate::repositories::{ReservationRepo, SpotRepo, TransactionRepo};
use crate::{DbError, DbPool};

/// Free capacity of a category over an interval: provisioned spots minus
/// booked/active reservations overlapping it.
pub async fn available(
    pool: &DbPool,
    category: VehicleCategory,
    interval: Interval,
) -> Result<i64, DbError> {
    let total = SpotRepo::total_in_category(pool, category.as_str()).await?;
    let taken = ReservationRepo::count_overlapping(
        pool,
        category.as_str(),
        interval.start,
        interval.end,
        None,
    )
    .await?;
    Ok((total - taken).max(0))
}

/// Book a spot for `[interval.start, interval.end)`, charging the full
/// duration up front and minting the gate pass.
pub async fn book(
    pool: &DbPool,
    owner_id: DbId,
    category: VehicleCategory,
    vehicle_number: &str,
    interval: Interval,
    now: Timestamp,
    pass_secret: &str,
) -> Result<Reservation, DbError> {
    if !plate::is_valid_plate(category, vehicle_number) {
        return Err(CoreError::Validation(format!(
            "Invalid vehicle number '{}'. Expected format: {}",
            vehicle_number,
            plate::expected_format(category)
        ))
        .into());
    }
    let vehicle_number = plate::normalize(category, vehicle_number);

    match book_once(pool, owner_id, category, &vehicle_number, interval, now, pass_secret).await {
        Err(e) if crate::is_write_conflict(&e) => {
            book_once(pool, owner_id, category, &vehicle_number, interval, now, pass_secret).await
        }
        result => result,
    }
}

async fn book_once(
    pool: &DbPool,
    owner_id: DbId,
    category: VehicleCategory,
    vehicle_number: &str,
    interval: Interval,
    now: Timestamp,
    pass_secret: &str,
) -> Result<Reservation, DbError> {
    let mut tx = pool.begin().await?;

    let spot =
        SpotRepo::find_free_for_interval(&mut *tx, category.as_str(), interval.start, interval.end)
            .await?
            .ok_or_else(|| CoreError::NoSpotAvailable(category.as_str().to_string()))?;

    let code = generate_code();
    let amount = interval.cost(category.hourly_rate());
    let pass_token = pass::mint(
        &code,
        owner_id,
        vehicle_number,
        category.as_str(),
        interval.start,
        interval.end,
        now,
        pass_secret,
    );

    let reservation = ReservationRepo::create(
        &mut *tx,
        &CreateReservation {
            code,
            owner_id,
            category: category.as_str().to_string(),
            vehicle_number: vehicle_number.to_string(),
            start_time: interval.start,
            end_time: interval.end,
            spot_id: spot.id,
            amount,
            pass_token,
        },
    )
    .await?;

    SpotRepo::set_status(&mut *tx, spot.id, SPOT_RESERVED, Some(reservation.id)).await?;

    TransactionRepo::create(
        &mut *tx,
        &CreateTransaction {
            owner_id,
            reservation_id: Some(reservation.id),
            kind: KIND_BOOKING.to_string(),
            amount,
            description: format!("Booking charge for reservation {}", reservation.code),
        },
    )
    .await?;

    tx.commit().await?;

    info!(
        code = %reservation.code,
        spot = %spot.spot_number,
        category = %category,
        amount,
        "reservation booked"
    );
    Ok(reservation)
}

/// Push a reservation's scheduled exit to `new_end`, charging for the added
/// hours. The added window is re-checked both against category capacity and
/// against other bookings holding the same spot.
pub async fn extend(
    pool: &DbPool,
    owner_id: DbId,
    code: &str,
    new_end: Timestamp,
) -> Result<Reservation, DbError> {
    match extend_once(pool, owner_id, code, new_end).await {
        Err(e) if crate::is_write_conflict(&e) => extend_once(pool, owner_id, code, new_end).await,
        result => result,
    }
}

async fn extend_once(
    pool: &DbPool,
    owner_id: DbId,
    code: &str,
    new_end: Timestamp,
) -> Result<Reservation, DbError> {
    let mut tx = pool.begin().await?;

    let reservation = ReservationRepo::find_for_owner(&mut *tx, code, owner_id)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "reservation",
            key: code.to_string(),
        })?;

    if reservation.is_terminal() {
        return Err(CoreError::TerminalStateViolation(format!(
            "Reservation {} is {} and cannot be extended",
            reservation.code, reservation.state
        ))
        .into());
    }
    // The added window must itself be a valid interval.
    let delta = Interval::new(reservation.end_time, new_end)?;

    let total = SpotRepo::total_in_category(&mut *tx, &reservation.category).await?;
    let taken = ReservationRepo::count_overlapping(
        &mut *tx,
        &reservation.category,
        delta.start,
        delta.end,
        Some(reservation.id),
    )
    .await?;
    if taken >= total {
        return Err(CoreError::NoSpotAvailable(reservation.category.clone()).into());
    }

    if let Some(spot_id) = reservation.spot_id {
        let conflict = ReservationRepo::spot_conflict_exists(
            &mut *tx,
            spot_id,
            delta.start,
            delta.end,
            Some(reservation.id),
        )
        .await?;
        if conflict {
            return Err(CoreError::NoSpotAvailable(reservation.category.clone()).into());
        }
    }

    let category: VehicleCategory = reservation.category.parse()?;
    let additional = delta.cost(category.hourly_rate());

    let updated = ReservationRepo::extend(&mut *tx, reservation.id, new_end, additional).await?;
    if !updated {
        // Lost a race with a concurrent terminal transition.
        return Err(CoreError::TerminalStateViolation(format!(
            "Reservation {} can no longer be extended",
            reservation.code
        ))
        .into());
    }

    TransactionRepo::create(
        &mut *tx,
        &CreateTransaction {
            owner_id,
            reservation_id: Some(reservation.id),
            kind: KIND_EXTENSION.to_string(),
            amount: additional,
            description: format!("Extension of reservation {}", reservation.code),
        },
    )
    .await?;

    let reservation = ReservationRepo::find_for_owner(&mut *tx, code, owner_id)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "reservation",
            key: code.to_string(),
        })?;

    tx.commit().await?;

    info!(code = %reservation.code, %new_end, additional, "reservation extended");
    Ok(reservation)
}

/// Cancel a booking that has not been used at a gate. The booking charge is
/// not refunded; the hold on the spot is released.
pub async fn cancel(pool: &DbPool, owner_id: DbId, code: &str) -> Result<Reservation, DbError> {
    match cancel_once(pool, owner_id, code).await {
        Err(e) if crate::is_write_conflict(&e) => cancel_once(pool, owner_id, code).await,
        result => result,
    }
}

async fn cancel_once(pool: &DbPool, owner_id: DbId, code: &str) -> Result<Reservation, DbError> {
    let mut tx = pool.begin().await?;

    let reservation = ReservationRepo::find_for_owner(&mut *tx, code, owner_id)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "reservation",
            key: code.to_string(),
        })?;

    let cancelled = ReservationRepo::cancel(&mut *tx, reservation.id).await?;
    if !cancelled {
        return Err(CoreError::TerminalStateViolation(format!(
            "Reservation {} is {} and cannot be cancelled",
            reservation.code, reservation.state
        ))
        .into());
    }

    if let Some(spot_id) = reservation.spot_id {
        SpotRepo::set_status(&mut *tx, spot_id, crate::models::spot::SPOT_AVAILABLE, None).await?;
    }

    let reservation = ReservationRepo::find_for_owner(&mut *tx, code, owner_id)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "reservation",
            key: code.to_string(),
        })?;

    tx.commit().await?;

    info!(code = %reservation.code, "reservation cancelled");
    Ok(reservation)
}

/// Public reservation code: `BK` + 8 uppercase hex chars.
fn generate_code() -> String {
    format!("BK{:08X}", rand::rng().random::<u32>())
}
