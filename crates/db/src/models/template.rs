//! Weekday template models. Read-only from this application's perspective.

use picklijst_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `picking_templates` table: store X needs lines on
/// weekday N.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TemplateEntry {
    pub id: DbId,
    pub weekday: i32,
    pub store_id: DbId,
}
