//! Repository for the `picking_templates` table (read-only).

use picklijst_core::types::DbId;
use sqlx::PgPool;

use crate::models::template::TemplateEntry;

/// Read operations on the weekday templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Store ids required on `weekday`, in template insertion order.
    pub async fn store_ids_for_weekday(
        pool: &PgPool,
        weekday: i32,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT store_id FROM picking_templates WHERE weekday = $1 ORDER BY id")
            .bind(weekday)
            .fetch_all(pool)
            .await
    }

    /// All template entries, for administrative inspection.
    pub async fn list(pool: &PgPool) -> Result<Vec<TemplateEntry>, sqlx::Error> {
        sqlx::query_as::<_, TemplateEntry>(
            "SELECT id, weekday, store_id FROM picking_templates ORDER BY weekday, id",
        )
        .fetch_all(pool)
        .await
    }
}
