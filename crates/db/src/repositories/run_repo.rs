//! Repository for the `picking_runs` table.

use picklijst_core::types::RunDate;
use sqlx::PgPool;

use crate::models::run::PickingRun;

const COLUMNS: &str = "id, run_date, created_at";

/// CRUD operations for picking runs. Runs are created lazily and never
/// deleted by this application.
pub struct RunRepo;

impl RunRepo {
    /// Find the run for a date, if it exists.
    pub async fn find_by_date(
        pool: &PgPool,
        run_date: RunDate,
    ) -> Result<Option<PickingRun>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM picking_runs WHERE run_date = $1");
        sqlx::query_as::<_, PickingRun>(&query)
            .bind(run_date)
            .fetch_optional(pool)
            .await
    }

    /// Get the run for a date, creating it if absent.
    ///
    /// Uses `ON CONFLICT (run_date) DO NOTHING` followed by a re-read so
    /// that two callers racing on a never-before-seen date both end up
    /// with the same row instead of one failing on the unique constraint.
    pub async fn get_or_create(
        pool: &PgPool,
        run_date: RunDate,
    ) -> Result<PickingRun, sqlx::Error> {
        sqlx::query("INSERT INTO picking_runs (run_date) VALUES ($1) ON CONFLICT (run_date) DO NOTHING")
            .bind(run_date)
            .execute(pool)
            .await?;

        let query = format!("SELECT {COLUMNS} FROM picking_runs WHERE run_date = $1");
        sqlx::query_as::<_, PickingRun>(&query)
            .bind(run_date)
            .fetch_one(pool)
            .await
    }
}
