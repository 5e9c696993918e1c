//! Reservation rows and lifecycle states.

use serde::Serialize;
use sqlx::FromRow;

use parkpass_core::types::{DbId, Money, Timestamp};

/// Created, paid for, vehicle not yet at the gate.
pub const STATE_BOOKED: &str = "booked";
/// Entry scan verified; vehicle inside.
pub const STATE_ACTIVE: &str = "active";
/// Exit scan verified. Terminal.
pub const STATE_COMPLETED: &str = "completed";
/// Cancelled before any entry scan. Terminal.
pub const STATE_CANCELLED: &str = "cancelled";

/// A row from the `reservations` table.
///
/// The row is also the spot-interval hold: a spot is taken for
/// `[start_time, end_time)` exactly when a booked/active reservation
/// references it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reservation {
    pub id: DbId,
    /// Public reservation code (`BK` + 8 hex chars), carried in the gate pass.
    pub code: String,
    pub owner_id: DbId,
    pub category: String,
    pub vehicle_number: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub actual_entry_time: Option<Timestamp>,
    pub actual_exit_time: Option<Timestamp>,
    pub spot_id: Option<DbId>,
    pub amount: Money,
    pub state: String,
    /// Entry and exit each consume one scan; capped at 2.
    pub scan_count: i64,
    pub pass_token: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Reservation {
    /// Whether no further lifecycle transition is permitted.
    pub fn is_terminal(&self) -> bool {
        self.state == STATE_COMPLETED || self.state == STATE_CANCELLED
    }
}

/// DTO for inserting a new reservation.
#[derive(Debug, Clone)]
pub struct CreateReservation {
    pub code: String,
    pub owner_id: DbId,
    pub category: String,
    pub vehicle_number: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub spot_id: DbId,
    pub amount: Money,
    pub pass_token: String,
}
