//! Physical parking spot rows.

use serde::Serialize;
use sqlx::FromRow;

use parkpass_core::types::{DbId, Timestamp};

/// Spot is free for its category pool.
pub const SPOT_AVAILABLE: &str = "available";
/// Spot is held by a booked reservation but the vehicle has not entered.
pub const SPOT_RESERVED: &str = "reserved";
/// Vehicle is physically parked on the spot.
pub const SPOT_OCCUPIED: &str = "occupied";

/// A row from the `spots` table. Created once at facility provisioning and
/// never destroyed.
///
/// `status` / `current_reservation_id` are display redundancy; availability
/// decisions always derive from reservation intervals.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Spot {
    pub id: DbId,
    pub spot_number: String,
    pub category: String,
    pub zone: String,
    pub floor_level: i64,
    pub status: String,
    pub current_reservation_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Per-zone occupancy counts for the live status view.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ZoneStatus {
    pub category: String,
    pub zone: String,
    pub total: i64,
    pub available: i64,
    pub occupied: i64,
    pub reserved: i64,
}
