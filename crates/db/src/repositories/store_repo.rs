//! Repository for the `stores` table (read-only catalog).

use picklijst_core::types::DbId;
use sqlx::PgPool;

use crate::models::store::Store;

const COLUMNS: &str = "id, code, name, active, created_at";

/// Read operations on the store catalog.
pub struct StoreRepo;

impl StoreRepo {
    /// List active stores, ordered by their display code.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Store>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stores WHERE active ORDER BY code");
        sqlx::query_as::<_, Store>(&query).fetch_all(pool).await
    }

    /// Find a store by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Store>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stores WHERE id = $1");
        sqlx::query_as::<_, Store>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
