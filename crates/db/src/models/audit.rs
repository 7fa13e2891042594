//! Audit trail models.
//!
//! Audit rows are point-in-time snapshots of a line after a mutation.
//! The table has no foreign keys and writes to it are best-effort: an
//! audit failure is never allowed to fail the line update it describes.

use picklijst_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::line::PickingLine;

/// A row from the `picking_line_audit` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LineAudit {
    pub id: DbId,
    pub line_id: DbId,
    pub run_id: DbId,
    pub store_id: DbId,
    pub metal: String,
    pub picker: Option<String>,
    pub status: String,
    pub changed_by: Option<DbId>,
    pub changed_at: Timestamp,
}

/// Snapshot DTO for inserting an audit row.
#[derive(Debug, Clone)]
pub struct CreateLineAudit {
    pub line_id: DbId,
    pub run_id: DbId,
    pub store_id: DbId,
    pub metal: String,
    pub picker: Option<String>,
    pub status: String,
    pub changed_by: Option<DbId>,
}

impl CreateLineAudit {
    /// Snapshot the state of `line` after a mutation by `changed_by`.
    pub fn snapshot(line: &PickingLine, changed_by: Option<DbId>) -> Self {
        Self {
            line_id: line.id,
            run_id: line.run_id,
            store_id: line.store_id,
            metal: line.metal.clone(),
            picker: line.picker.clone(),
            status: line.status.clone(),
            changed_by,
        }
    }
}
