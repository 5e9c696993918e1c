//! Route definitions for the billing ledger, mounted at `/transactions`.

use axum::routing::get;
use axum::Router;

use crate::handlers::transaction;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(transaction::list))
}
