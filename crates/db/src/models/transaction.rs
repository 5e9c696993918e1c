//! Append-only billing ledger rows.

use serde::Serialize;
use sqlx::FromRow;

use parkpass_core::types::{DbId, Money, Timestamp};

/// Initial booking charge.
pub const KIND_BOOKING: &str = "booking";
/// Overstay / late-exit surcharge.
pub const KIND_FINE: &str = "fine";
/// Incremental charge for widening a booking.
pub const KIND_EXTENSION: &str = "extension";

/// A row from the `transactions` table. Never mutated or deleted; owner
/// totals are reconstructed by summing amounts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LedgerEntry {
    pub id: DbId,
    pub code: String,
    pub owner_id: DbId,
    pub reservation_id: Option<DbId>,
    pub kind: String,
    pub amount: Money,
    pub description: String,
    pub created_at: Timestamp,
}

/// DTO for appending a ledger entry.
#[derive(Debug, Clone)]
pub struct CreateTransaction {
    pub owner_id: DbId,
    pub reservation_id: Option<DbId>,
    pub kind: String,
    pub amount: Money,
    pub description: String,
}
