//! Route definitions for the gate checkpoints, mounted at `/gate`.
//!
//! ```text
//! POST /entry   -> entry
//! POST /exit    -> exit
//! GET  /scans   -> scans
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::gate;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/entry", post(gate::entry))
        .route("/exit", post(gate::exit))
        .route("/scans", get(gate::scans))
}
