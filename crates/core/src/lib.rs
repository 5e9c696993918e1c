//! Domain types and pure logic for the ParkPass parking system.
//!
//! Everything here is independent of the database and HTTP layers:
//! the error taxonomy, vehicle categories and rates, half-open time
//! intervals, the gate-pass codec, exit-charge policies, and the
//! number-plate predicate.

pub mod billing;
pub mod category;
pub mod error;
pub mod interval;
pub mod pass;
pub mod plate;
pub mod types;
