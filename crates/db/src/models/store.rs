//! Store catalog models.
//!
//! Stores are owned by an external catalog; this application only reads
//! them, so there are no create/update DTOs here.

use picklijst_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `stores` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Store {
    pub id: DbId,
    /// Short display key, unique, rendered uppercased in clients.
    pub code: String,
    pub name: String,
    pub active: bool,
    pub created_at: Timestamp,
}
