//! Route definitions for the live status view, mounted at `/status`.

use axum::routing::get;
use axum::Router;

use crate::handlers::status;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(status::zones))
}
