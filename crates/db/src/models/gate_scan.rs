//! Append-only gate scan events.

use serde::Serialize;
use sqlx::FromRow;

use parkpass_core::types::{DbId, Money, Timestamp};

pub const GATE_ENTRY: &str = "entry";
pub const GATE_EXIT: &str = "exit";

/// A row from the `gate_scans` table. Immutable once written; denied scans
/// are recorded too whenever the reservation could be identified.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GateScan {
    pub id: DbId,
    pub reservation_id: DbId,
    pub gate_type: String,
    pub vehicle_number: String,
    pub scanned_at: Timestamp,
    pub authorized: bool,
    pub overstay: bool,
    pub surcharge: Money,
    pub reason: String,
}

/// DTO for appending a scan event.
#[derive(Debug, Clone)]
pub struct CreateGateScan {
    pub reservation_id: DbId,
    pub gate_type: String,
    pub vehicle_number: String,
    pub scanned_at: Timestamp,
    pub authorized: bool,
    pub overstay: bool,
    pub surcharge: Money,
    pub reason: String,
}
