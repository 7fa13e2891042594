//! Repository for the `picking_line_audit` table.

use picklijst_core::types::DbId;
use sqlx::PgPool;

use crate::models::audit::{CreateLineAudit, LineAudit};

const COLUMNS: &str =
    "id, line_id, run_id, store_id, metal, picker, status, changed_by, changed_at";

/// Append-only access to the audit log.
///
/// Callers treat failures from [`insert`](AuditRepo::insert) as
/// non-fatal: the audit trail is a side channel, never part of the
/// transactional contract of a line update.
pub struct AuditRepo;

impl AuditRepo {
    /// Append one audit snapshot.
    pub async fn insert(pool: &PgPool, input: &CreateLineAudit) -> Result<LineAudit, sqlx::Error> {
        let query = format!(
            "INSERT INTO picking_line_audit \
                (line_id, run_id, store_id, metal, picker, status, changed_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LineAudit>(&query)
            .bind(input.line_id)
            .bind(input.run_id)
            .bind(input.store_id)
            .bind(&input.metal)
            .bind(&input.picker)
            .bind(&input.status)
            .bind(input.changed_by)
            .fetch_one(pool)
            .await
    }

    /// Audit history for one line, newest first.
    pub async fn list_for_line(pool: &PgPool, line_id: DbId) -> Result<Vec<LineAudit>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM picking_line_audit \
             WHERE line_id = $1 ORDER BY changed_at DESC, id DESC"
        );
        sqlx::query_as::<_, LineAudit>(&query)
            .bind(line_id)
            .fetch_all(pool)
            .await
    }
}
