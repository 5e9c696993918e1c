//! Route definitions for reservations, mounted at `/reservations`.
//!
//! ```text
//! GET  /                 -> list
//! POST /                 -> create
//! GET  /{code}           -> get_by_code
//! POST /{code}/extend    -> extend
//! POST /{code}/cancel    -> cancel
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reservation;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reservation::list).post(reservation::create))
        .route("/{code}", get(reservation::get_by_code))
        .route("/{code}/extend", post(reservation::extend))
        .route("/{code}/cancel", post(reservation::cancel))
}
