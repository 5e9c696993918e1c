//! Handler for the owner's billing ledger.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use parkpass_core::types::Money;
use parkpass_db::models::LedgerEntry;
use parkpass_db::repositories::TransactionRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthOwner;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for `GET /api/v1/transactions`.
#[derive(Debug, Serialize)]
pub struct TransactionsResponse {
    pub entries: Vec<LedgerEntry>,
    pub total_spent: Money,
}

/// GET /api/v1/transactions
///
/// The authenticated owner's full ledger with the lifetime total.
pub async fn list(
    owner: AuthOwner,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let entries = TransactionRepo::list_for_owner(&state.pool, owner.owner_id).await?;
    let total_spent = TransactionRepo::total_for_owner(&state.pool, owner.owner_id).await?;

    Ok(Json(DataResponse {
        data: TransactionsResponse {
            entries,
            total_spent,
        },
    }))
}
