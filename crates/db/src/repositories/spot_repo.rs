//! Repository for the `spots` table.

use sqlx::SqliteExecutor;

use parkpass_core::types::{DbId, Timestamp};

use crate::models::spot::{Spot, ZoneStatus};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, spot_number, category, zone, floor_level, status, \
                       current_reservation_id, created_at, updated_at";

/// Provides queries over physical parking spots.
pub struct SpotRepo;

impl SpotRepo {
    pub async fn find_by_id<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Spot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM spots WHERE id = $1");
        sqlx::query_as::<_, Spot>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Total number of spots provisioned for a category.
    pub async fn total_in_category<'e>(
        executor: impl SqliteExecutor<'e>,
        category: &str,
    ) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM spots WHERE category = $1")
            .bind(category)
            .fetch_one(executor)
            .await?;
        Ok(count.0)
    }

    /// Lowest free spot by (zone, spot_number) for the interval, or `None`.
    ///
    /// A spot is free when no booked/active reservation holds it over an
    /// overlapping interval; the stored `status` column is deliberately not
    /// consulted (reservations are authoritative).
    pub async fn find_free_for_interval<'e>(
        executor: impl SqliteExecutor<'e>,
        category: &str,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Option<Spot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM spots s
             WHERE s.category = $1
               AND NOT EXISTS (
                   SELECT 1 FROM reservations r
                   WHERE r.spot_id = s.id
                     AND r.state IN ('booked', 'active')
                     AND datetime(r.start_time) < datetime($3)
                     AND datetime(r.end_time) > datetime($2)
               )
             ORDER BY s.zone, s.spot_number
             LIMIT 1"
        );
        sqlx::query_as::<_, Spot>(&query)
            .bind(category)
            .bind(start)
            .bind(end)
            .fetch_optional(executor)
            .await
    }

    /// Update the display status and back-reference. Returns `true` if the
    /// row was updated.
    pub async fn set_status<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
        status: &str,
        current_reservation_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE spots
             SET status = $2,
                 current_reservation_id = $3,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .bind(current_reservation_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Per-zone {total, available, occupied, reserved} counts, optionally
    /// filtered by category.
    pub async fn zone_status<'e>(
        executor: impl SqliteExecutor<'e>,
        category: Option<&str>,
    ) -> Result<Vec<ZoneStatus>, sqlx::Error> {
        sqlx::query_as::<_, ZoneStatus>(
            "SELECT category, zone,
                    COUNT(*) AS total,
                    SUM(CASE WHEN status = 'available' THEN 1 ELSE 0 END) AS available,
                    SUM(CASE WHEN status = 'occupied' THEN 1 ELSE 0 END) AS occupied,
                    SUM(CASE WHEN status = 'reserved' THEN 1 ELSE 0 END) AS reserved
             FROM spots
             WHERE ($1 IS NULL OR category = $1)
             GROUP BY category, zone
             ORDER BY category, zone",
        )
        .bind(category)
        .fetch_all(executor)
        .await
    }
}
