pub mod gate;
pub mod reservation;
pub mod status;
pub mod transaction;
