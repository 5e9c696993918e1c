use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: parkpass_db::DbPool,
    /// Server configuration (gate secret, exit policy, JWT).
    pub config: Arc<ServerConfig>,
}
