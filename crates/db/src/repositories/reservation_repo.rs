//! Repository for the `reservations` table.
//!
//! All lifecycle transitions are compare-and-set updates whose WHERE clause
//! re-checks the precondition, so two concurrent callers can never both
//! succeed; callers inspect the returned bool and re-read on failure.

use sqlx::SqliteExecutor;

use parkpass_core::types::{DbId, Money, Timestamp};

use crate::models::reservation::{CreateReservation, Reservation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, code, owner_id, category, vehicle_number, start_time, end_time, \
                       actual_entry_time, actual_exit_time, spot_id, amount, state, \
                       scan_count, pass_token, created_at, updated_at";

/// Provides CRUD and compare-and-set transitions for reservations.
pub struct ReservationRepo;

impl ReservationRepo {
    /// Insert a new booked reservation, returning the created row.
    pub async fn create<'e>(
        executor: impl SqliteExecutor<'e>,
        input: &CreateReservation,
    ) -> Result<Reservation, sqlx::Error> {
        let query = format!(
            "INSERT INTO reservations
                 (code, owner_id, category, vehicle_number, start_time, end_time,
                  spot_id, amount, pass_token)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(&input.code)
            .bind(input.owner_id)
            .bind(&input.category)
            .bind(&input.vehicle_number)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.spot_id)
            .bind(input.amount)
            .bind(&input.pass_token)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_code<'e>(
        executor: impl SqliteExecutor<'e>,
        code: &str,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservations WHERE code = $1");
        sqlx::query_as::<_, Reservation>(&query)
            .bind(code)
            .fetch_optional(executor)
            .await
    }

    /// Find a reservation by code, scoped to its owner.
    pub async fn find_for_owner<'e>(
        executor: impl SqliteExecutor<'e>,
        code: &str,
        owner_id: DbId,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM reservations WHERE code = $1 AND owner_id = $2");
        sqlx::query_as::<_, Reservation>(&query)
            .bind(code)
            .bind(owner_id)
            .fetch_optional(executor)
            .await
    }

    /// All reservations of an owner, newest first.
    pub async fn list_for_owner<'e>(
        executor: impl SqliteExecutor<'e>,
        owner_id: DbId,
    ) -> Result<Vec<Reservation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reservations WHERE owner_id = $1 ORDER BY id DESC"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(owner_id)
            .fetch_all(executor)
            .await
    }

    /// Count booked/active reservations of `category` overlapping
    /// `[start, end)`, optionally excluding one reservation (extension
    /// re-checks must not count the reservation being extended).
    pub async fn count_overlapping<'e>(
        executor: impl SqliteExecutor<'e>,
        category: &str,
        start: Timestamp,
        end: Timestamp,
        exclude_id: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM reservations
             WHERE category = $1
               AND state IN ('booked', 'active')
               AND datetime(start_time) < datetime($3)
               AND datetime(end_time) > datetime($2)
               AND ($4 IS NULL OR id != $4)",
        )
        .bind(category)
        .bind(start)
        .bind(end)
        .bind(exclude_id)
        .fetch_one(executor)
        .await?;
        Ok(count.0)
    }

    /// Whether any other booked/active reservation holds `spot_id` over an
    /// interval overlapping `[start, end)`.
    pub async fn spot_conflict_exists<'e>(
        executor: impl SqliteExecutor<'e>,
        spot_id: DbId,
        start: Timestamp,
        end: Timestamp,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM reservations
             WHERE spot_id = $1
               AND state IN ('booked', 'active')
               AND datetime(start_time) < datetime($3)
               AND datetime(end_time) > datetime($2)
               AND ($4 IS NULL OR id != $4)",
        )
        .bind(spot_id)
        .bind(start)
        .bind(end)
        .bind(exclude_id)
        .fetch_one(executor)
        .await?;
        Ok(count.0 > 0)
    }

    /// Record a verified entry scan. Fails (returns `false`) unless the
    /// reservation is still booked, unscanned, and under the scan cap.
    pub async fn mark_entered<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
        now: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE reservations
             SET actual_entry_time = $2,
                 scan_count = scan_count + 1,
                 state = 'active',
                 updated_at = $2
             WHERE id = $1
               AND state = 'booked'
               AND scan_count < 2
               AND actual_entry_time IS NULL",
        )
        .bind(id)
        .bind(now)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a verified exit scan and fold the surcharge into the accrued
    /// amount. Fails unless entered, not yet exited, and under the scan cap.
    pub async fn mark_exited<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
        now: Timestamp,
        surcharge: Money,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE reservations
             SET actual_exit_time = $2,
                 scan_count = scan_count + 1,
                 state = 'completed',
                 amount = amount + $3,
                 updated_at = $2
             WHERE id = $1
               AND state = 'active'
               AND scan_count < 2
               AND actual_entry_time IS NOT NULL
               AND actual_exit_time IS NULL",
        )
        .bind(id)
        .bind(now)
        .bind(surcharge)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Cancel a booked reservation that has never been scanned.
    pub async fn cancel<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE reservations
             SET state = 'cancelled',
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = $1
               AND state = 'booked'
               AND actual_entry_time IS NULL",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Widen a non-terminal reservation to `new_end` and add the
    /// incremental cost.
    pub async fn extend<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
        new_end: Timestamp,
        additional_amount: Money,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE reservations
             SET end_time = $2,
                 amount = amount + $3,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = $1
               AND state IN ('booked', 'active')",
        )
        .bind(id)
        .bind(new_end)
        .bind(additional_amount)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
