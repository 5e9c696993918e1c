//! Named-field row types and create DTOs for every table.

pub mod gate_scan;
pub mod reservation;
pub mod spot;
pub mod transaction;

pub use gate_scan::{CreateGateScan, GateScan};
pub use reservation::{CreateReservation, Reservation};
pub use spot::{Spot, ZoneStatus};
pub use transaction::{CreateTransaction, LedgerEntry};
