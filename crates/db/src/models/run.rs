//! Picking run models.

use picklijst_core::types::{DbId, RunDate, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `picking_runs` table. At most one run exists per
/// calendar date (`uq_picking_runs_run_date`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PickingRun {
    pub id: DbId,
    pub run_date: RunDate,
    pub created_at: Timestamp,
}
