//! Persistence layer: pool bootstrap, migrations, sqlx models and
//! repositories, and the transactional allocation / gate-scan engine.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use parkpass_core::error::CoreError;

pub mod allocator;
pub mod gate;
pub mod models;
pub mod repositories;

/// Database connection pool. SQLite serializes writers, which is the
/// isolation the allocation path relies on.
pub type DbPool = sqlx::SqlitePool;

/// Errors surfaced by the engine operations: either a domain outcome
/// ([`CoreError`]) or a database failure.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// True when a statement lost a write race between snapshot transactions.
/// SQLite reports this as `SQLITE_BUSY` / `SQLITE_BUSY_SNAPSHOT` on the
/// losing write instead of failing the conflicting row, so the engine
/// retries the whole operation once and lets the re-run observe the
/// committed winner.
pub(crate) fn is_write_conflict(err: &DbError) -> bool {
    match err {
        DbError::Database(sqlx::Error::Database(db)) => {
            matches!(db.code().as_deref(), Some("5") | Some("517"))
        }
        _ => false,
    }
}

/// Create a connection pool for the given SQLite URL, creating the file if
/// missing. WAL mode keeps readers unblocked while a writer commits.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Cheap connectivity probe used at startup and by the health endpoint.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
