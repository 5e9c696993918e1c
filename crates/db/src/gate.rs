//! Gate checkpoint state machine.
//!
//! A pass is scanned once at entry and once at exit. Decoding and checksum
//! verification happen at the edge (the caller holds the secret); this
//! module takes verified claims and applies the lifecycle rules against the
//! reservation row, which is authoritative. Denied scans are recorded in
//! the scan log; a pass that never decoded leaves no row because there is
//! nothing to attach it to.

use tracing::{info, warn};

use parkpass_core::billing::{exit_charge, OverstayPolicy};
use parkpass_core::category::VehicleCategory;
use parkpass_core::error::CoreError;
use parkpass_core::interval::Interval;
use parkpass_core::pass::PassClaims;
use parkpass_core::types::Timestamp;

use crate::models::gate_scan::{CreateGateScan, GateScan, GATE_ENTRY, GATE_EXIT};
use crate::models::reservation::Reservation;
use crate::models::spot::{SPOT_AVAILABLE, SPOT_OCCUPIED};
use crate::models::transaction::{CreateTransaction, KIND_FINE};
use crate::repositories::{GateScanRepo, ReservationRepo, SpotRepo, TransactionRepo};
use crate::{DbError, DbPool};

/// Outcome of an authorized scan.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub reservation: Reservation,
    pub scan: GateScan,
}

/// Admit a vehicle at the entry gate from verified pass claims.
pub async fn scan_entry(
    pool: &DbPool,
    claims: &PassClaims,
    now: Timestamp,
) -> Result<ScanResult, DbError> {
    match scan_entry_once(pool, claims, now).await {
        Err(e) if crate::is_write_conflict(&e) => scan_entry_once(pool, claims, now).await,
        result => result,
    }
}

async fn scan_entry_once(
    pool: &DbPool,
    claims: &PassClaims,
    now: Timestamp,
) -> Result<ScanResult, DbError> {
    // The row is read inside the transaction so the state checked is the
    // state transitioned.
    let mut tx = pool.begin().await?;

    let reservation = ReservationRepo::find_by_code(&mut *tx, &claims.code)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "reservation",
            key: claims.code.clone(),
        })?;

    if let Err(e) = check_entry_preconditions(&reservation) {
        drop(tx);
        deny(pool, &reservation, GATE_ENTRY, now, &e).await?;
        return Err(e.into());
    }

    let entered = ReservationRepo::mark_entered(&mut *tx, reservation.id, now).await?;
    if !entered {
        // Lost a race with another scan of the same pass.
        drop(tx);
        let e = CoreError::AlreadyEntered;
        deny(pool, &reservation, GATE_ENTRY, now, &e).await?;
        return Err(e.into());
    }

    let scan = GateScanRepo::create(
        &mut *tx,
        &CreateGateScan {
            reservation_id: reservation.id,
            gate_type: GATE_ENTRY.to_string(),
            vehicle_number: reservation.vehicle_number.clone(),
            scanned_at: now,
            authorized: true,
            overstay: false,
            surcharge: 0,
            reason: "Entry authorized".to_string(),
        },
    )
    .await?;

    if let Some(spot_id) = reservation.spot_id {
        SpotRepo::set_status(&mut *tx, spot_id, SPOT_OCCUPIED, Some(reservation.id)).await?;
    }

    let reservation = ReservationRepo::find_by_code(&mut *tx, &claims.code)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "reservation",
            key: claims.code.clone(),
        })?;

    tx.commit().await?;

    info!(code = %reservation.code, vehicle = %reservation.vehicle_number, "entry authorized");
    Ok(ScanResult { reservation, scan })
}

/// Release a vehicle at the exit gate, assessing any exit charge under the
/// configured policy.
pub async fn scan_exit(
    pool: &DbPool,
    claims: &PassClaims,
    policy: OverstayPolicy,
    now: Timestamp,
) -> Result<ScanResult, DbError> {
    match scan_exit_once(pool, claims, policy, now).await {
        Err(e) if crate::is_write_conflict(&e) => scan_exit_once(pool, claims, policy, now).await,
        result => result,
    }
}

async fn scan_exit_once(
    pool: &DbPool,
    claims: &PassClaims,
    policy: OverstayPolicy,
    now: Timestamp,
) -> Result<ScanResult, DbError> {
    // Read and charge computation happen inside the transaction so the
    // surcharge is billed against the window the exit actually closes; a
    // concurrent extension either lands before the read or after the commit.
    let mut tx = pool.begin().await?;

    let reservation = ReservationRepo::find_by_code(&mut *tx, &claims.code)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "reservation",
            key: claims.code.clone(),
        })?;

    if let Err(e) = check_exit_preconditions(&reservation) {
        drop(tx);
        deny(pool, &reservation, GATE_EXIT, now, &e).await?;
        return Err(e.into());
    }
    let Some(actual_entry) = reservation.actual_entry_time else {
        let e = CoreError::NotYetEntered;
        drop(tx);
        deny(pool, &reservation, GATE_EXIT, now, &e).await?;
        return Err(e.into());
    };

    let category: VehicleCategory = reservation.category.parse()?;
    let booked_hours = Interval::new(reservation.start_time, reservation.end_time)?.billed_hours();
    let charge = exit_charge(
        policy,
        category,
        booked_hours,
        actual_entry,
        reservation.end_time,
        now,
    );

    let exited = ReservationRepo::mark_exited(&mut *tx, reservation.id, now, charge.surcharge).await?;
    if !exited {
        drop(tx);
        let e = CoreError::AlreadyExited;
        deny(pool, &reservation, GATE_EXIT, now, &e).await?;
        return Err(e.into());
    }

    let reason = if charge.overstay {
        format!("Exit authorized with overstay surcharge of {}", charge.surcharge)
    } else {
        "Exit authorized".to_string()
    };
    let scan = GateScanRepo::create(
        &mut *tx,
        &CreateGateScan {
            reservation_id: reservation.id,
            gate_type: GATE_EXIT.to_string(),
            vehicle_number: reservation.vehicle_number.clone(),
            scanned_at: now,
            authorized: true,
            overstay: charge.overstay,
            surcharge: charge.surcharge,
            reason,
        },
    )
    .await?;

    if charge.surcharge > 0 {
        TransactionRepo::create(
            &mut *tx,
            &CreateTransaction {
                owner_id: reservation.owner_id,
                reservation_id: Some(reservation.id),
                kind: KIND_FINE.to_string(),
                amount: charge.surcharge,
                description: format!("Overstay fine for reservation {}", reservation.code),
            },
        )
        .await?;
    }

    if let Some(spot_id) = reservation.spot_id {
        SpotRepo::set_status(&mut *tx, spot_id, SPOT_AVAILABLE, None).await?;
    }

    let reservation = ReservationRepo::find_by_code(&mut *tx, &claims.code)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "reservation",
            key: claims.code.clone(),
        })?;

    tx.commit().await?;

    if charge.overstay {
        warn!(
            code = %reservation.code,
            surcharge = charge.surcharge,
            "exit authorized with overstay"
        );
    } else {
        info!(code = %reservation.code, "exit authorized");
    }
    Ok(ScanResult { reservation, scan })
}

/// State checks for the entry gate, in precedence order.
fn check_entry_preconditions(reservation: &Reservation) -> Result<(), CoreError> {
    if reservation.state == crate::models::reservation::STATE_CANCELLED {
        return Err(CoreError::ReservationCancelled);
    }
    if reservation.scan_count >= 2 {
        return Err(CoreError::TokenExhausted);
    }
    if reservation.actual_exit_time.is_some() {
        return Err(CoreError::AlreadyExited);
    }
    if reservation.actual_entry_time.is_some() {
        return Err(CoreError::AlreadyEntered);
    }
    Ok(())
}

/// State checks for the exit gate, in precedence order.
fn check_exit_preconditions(reservation: &Reservation) -> Result<(), CoreError> {
    if reservation.state == crate::models::reservation::STATE_CANCELLED {
        return Err(CoreError::ReservationCancelled);
    }
    if reservation.scan_count >= 2 {
        return Err(CoreError::TokenExhausted);
    }
    if reservation.actual_exit_time.is_some() {
        return Err(CoreError::AlreadyExited);
    }
    if reservation.actual_entry_time.is_none() {
        return Err(CoreError::NotYetEntered);
    }
    Ok(())
}

/// Record a denied scan against an identified reservation.
async fn deny(
    pool: &DbPool,
    reservation: &Reservation,
    gate_type: &str,
    now: Timestamp,
    cause: &CoreError,
) -> Result<(), DbError> {
    warn!(
        code = %reservation.code,
        gate = gate_type,
        cause = %cause,
        "gate scan denied"
    );
    GateScanRepo::create(
        pool,
        &CreateGateScan {
            reservation_id: reservation.id,
            gate_type: gate_type.to_string(),
            vehicle_number: reservation.vehicle_number.clone(),
            scanned_at: now,
            authorized: false,
            overstay: false,
            surcharge: 0,
            reason: cause.to_string(),
        },
    )
    .await?;
    Ok(())
}
