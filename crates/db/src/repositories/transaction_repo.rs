//! Repository for the append-only `transactions` ledger.

use sqlx::SqliteExecutor;
use uuid::Uuid;

use parkpass_core::types::{DbId, Money};

use crate::models::transaction::{CreateTransaction, LedgerEntry};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, code, owner_id, reservation_id, kind, amount, description, created_at";

/// Provides append and read access to billing ledger entries.
pub struct TransactionRepo;

impl TransactionRepo {
    /// Append a ledger entry with a freshly generated code.
    pub async fn create<'e>(
        executor: impl SqliteExecutor<'e>,
        input: &CreateTransaction,
    ) -> Result<LedgerEntry, sqlx::Error> {
        let code = generate_code();
        let query = format!(
            "INSERT INTO transactions
                 (code, owner_id, reservation_id, kind, amount, description)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LedgerEntry>(&query)
            .bind(&code)
            .bind(input.owner_id)
            .bind(input.reservation_id)
            .bind(&input.kind)
            .bind(input.amount)
            .bind(&input.description)
            .fetch_one(executor)
            .await
    }

    /// All ledger entries for an owner, newest first.
    pub async fn list_for_owner<'e>(
        executor: impl SqliteExecutor<'e>,
        owner_id: DbId,
    ) -> Result<Vec<LedgerEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM transactions WHERE owner_id = $1 ORDER BY id DESC"
        );
        sqlx::query_as::<_, LedgerEntry>(&query)
            .bind(owner_id)
            .fetch_all(executor)
            .await
    }

    /// Ledger entries tied to one reservation, oldest first.
    pub async fn list_for_reservation<'e>(
        executor: impl SqliteExecutor<'e>,
        reservation_id: DbId,
    ) -> Result<Vec<LedgerEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM transactions WHERE reservation_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, LedgerEntry>(&query)
            .bind(reservation_id)
            .fetch_all(executor)
            .await
    }

    /// Lifetime total an owner has been charged.
    pub async fn total_for_owner<'e>(
        executor: impl SqliteExecutor<'e>,
        owner_id: DbId,
    ) -> Result<Money, sqlx::Error> {
        let total: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE owner_id = $1",
        )
        .bind(owner_id)
        .fetch_one(executor)
        .await?;
        Ok(total.0)
    }
}

/// Short uppercase hex reference printed on receipts.
fn generate_code() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("TXN{}", &id[..13].to_uppercase())
}
