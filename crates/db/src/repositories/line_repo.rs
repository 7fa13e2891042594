//! Repository for the `picking_lines` table.

use picklijst_core::reconcile::LineKey;
use picklijst_core::types::DbId;
use sqlx::PgPool;

use crate::models::line::{LineKeyRow, LineWithStore, PickingLine, UpdateLine};

const COLUMNS: &str = "id, run_id, store_id, metal, picker, status, created_at, updated_at";

const JOINED_COLUMNS: &str = "l.id, l.run_id, l.store_id, l.metal, l.picker, l.status, \
     s.code AS store_code, s.name AS store_name, l.updated_at";

/// CRUD operations for picking lines. Lines are created by
/// reconciliation, mutated by user edits, and never deleted by this
/// application.
pub struct LineRepo;

impl LineRepo {
    /// Find a line by ID (raw row, no store join).
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PickingLine>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM picking_lines WHERE id = $1");
        sqlx::query_as::<_, PickingLine>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The (store, metal) keys that already have a line in this run,
    /// restricted to the given stores.
    pub async fn existing_keys(
        pool: &PgPool,
        run_id: DbId,
        store_ids: &[DbId],
    ) -> Result<Vec<LineKeyRow>, sqlx::Error> {
        sqlx::query_as::<_, LineKeyRow>(
            "SELECT store_id, metal FROM picking_lines \
             WHERE run_id = $1 AND store_id = ANY($2)",
        )
        .bind(run_id)
        .bind(store_ids)
        .fetch_all(pool)
        .await
    }

    /// Insert lines for the given keys with status TE_DOEN and no picker.
    ///
    /// Idempotent: `ON CONFLICT (run_id, store_id, metal) DO NOTHING`
    /// makes concurrent reconciliations (two tabs loading the same date)
    /// collapse into a single winner per key. Returns only the rows this
    /// call actually inserted, so the caller can announce them on the
    /// change feed.
    pub async fn insert_missing(
        pool: &PgPool,
        run_id: DbId,
        keys: &[LineKey],
    ) -> Result<Vec<PickingLine>, sqlx::Error> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let store_ids: Vec<DbId> = keys.iter().map(|k| k.store_id).collect();
        let metals: Vec<String> = keys.iter().map(|k| k.metal.as_str().to_string()).collect();

        let query = format!(
            "INSERT INTO picking_lines (run_id, store_id, metal) \
             SELECT $1, t.store_id, t.metal \
             FROM UNNEST($2::BIGINT[], $3::TEXT[]) AS t(store_id, metal) \
             ON CONFLICT (run_id, store_id, metal) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PickingLine>(&query)
            .bind(run_id)
            .bind(&store_ids)
            .bind(&metals)
            .fetch_all(pool)
            .await
    }

    /// Lines for a run restricted to the given stores, joined with store
    /// display fields, in display order (store code, then ZILVER before
    /// STAAL).
    pub async fn list_for_run_with_stores(
        pool: &PgPool,
        run_id: DbId,
        store_ids: &[DbId],
    ) -> Result<Vec<LineWithStore>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM picking_lines l \
             JOIN stores s ON s.id = l.store_id \
             WHERE l.run_id = $1 AND l.store_id = ANY($2) \
             ORDER BY s.code, CASE l.metal WHEN 'ZILVER' THEN 0 ELSE 1 END"
        );
        sqlx::query_as::<_, LineWithStore>(&query)
            .bind(run_id)
            .bind(store_ids)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial patch to a line. Only the fields present in
    /// `patch` change; an explicit `picker: null` clears the picker.
    /// Returns the updated row, or `None` if the id does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &UpdateLine,
    ) -> Result<Option<PickingLine>, sqlx::Error> {
        let query = format!(
            "UPDATE picking_lines SET \
                picker = CASE WHEN $2 THEN $3 ELSE picker END, \
                status = COALESCE($4, status), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PickingLine>(&query)
            .bind(id)
            .bind(patch.picker.is_some())
            .bind(patch.picker.clone().flatten())
            .bind(patch.status.map(|s| s.as_str()))
            .fetch_optional(pool)
            .await
    }
}
