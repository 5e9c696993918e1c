pub mod gate;
pub mod health;
pub mod reservation;
pub mod status;
pub mod transaction;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /reservations                  create (auth), list (auth)
/// /reservations/{code}           detail (auth)
/// /reservations/{code}/extend    push the scheduled exit later (auth)
/// /reservations/{code}/cancel    cancel an unused booking (auth)
///
/// /availability                  free capacity over a window (public)
///
/// /gate/entry                    entry checkpoint (device-facing)
/// /gate/exit                     exit checkpoint (device-facing)
/// /gate/scans                    recent scan events
///
/// /status                        per-zone occupancy counts (public)
/// /transactions                  owner's ledger with total (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/reservations", reservation::router())
        .route("/availability", get(handlers::reservation::availability))
        .nest("/gate", gate::router())
        .nest("/status", status::router())
        .nest("/transactions", transaction::router())
}
