//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! any SQLite executor as the first argument, so the same query runs against
//! the pool or inside an engine transaction.

pub mod gate_scan_repo;
pub mod reservation_repo;
pub mod spot_repo;
pub mod transaction_repo;

pub use gate_scan_repo::GateScanRepo;
pub use reservation_repo::ReservationRepo;
pub use spot_repo::SpotRepo;
pub use transaction_repo::TransactionRepo;
