//! Repository for the `gate_scans` table.

use sqlx::SqliteExecutor;

use parkpass_core::types::DbId;

use crate::models::gate_scan::{CreateGateScan, GateScan};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, reservation_id, gate_type, vehicle_number, scanned_at, \
                       authorized, overstay, surcharge, reason";

/// Provides append and read access to gate scan events.
pub struct GateScanRepo;

impl GateScanRepo {
    /// Append a scan event, returning the created row.
    pub async fn create<'e>(
        executor: impl SqliteExecutor<'e>,
        input: &CreateGateScan,
    ) -> Result<GateScan, sqlx::Error> {
        let query = format!(
            "INSERT INTO gate_scans
                 (reservation_id, gate_type, vehicle_number, scanned_at,
                  authorized, overstay, surcharge, reason)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GateScan>(&query)
            .bind(input.reservation_id)
            .bind(&input.gate_type)
            .bind(&input.vehicle_number)
            .bind(input.scanned_at)
            .bind(input.authorized)
            .bind(input.overstay)
            .bind(input.surcharge)
            .bind(&input.reason)
            .fetch_one(executor)
            .await
    }

    /// Scan history for one reservation, oldest first.
    pub async fn list_for_reservation<'e>(
        executor: impl SqliteExecutor<'e>,
        reservation_id: DbId,
    ) -> Result<Vec<GateScan>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM gate_scans WHERE reservation_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, GateScan>(&query)
            .bind(reservation_id)
            .fetch_all(executor)
            .await
    }

    /// Most recent scans across all gates, newest first.
    pub async fn list_recent<'e>(
        executor: impl SqliteExecutor<'e>,
        limit: i64,
    ) -> Result<Vec<GateScan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM gate_scans ORDER BY id DESC LIMIT $1");
        sqlx::query_as::<_, GateScan>(&query)
            .bind(limit)
            .fetch_all(executor)
            .await
    }
}
