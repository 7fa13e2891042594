//! Picking line models and DTOs.

use picklijst_core::picking::LineStatus;
use picklijst_core::types::{DbId, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// A raw row from the `picking_lines` table, as carried by the change
/// feed (no store join).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PickingLine {
    pub id: DbId,
    pub run_id: DbId,
    pub store_id: DbId,
    pub metal: String,
    pub picker: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A picking line joined with its store's display fields.
///
/// The join is flattened here, at the data-access boundary, so callers
/// never see a nested object-or-array store shape.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LineWithStore {
    pub id: DbId,
    pub run_id: DbId,
    pub store_id: DbId,
    pub metal: String,
    pub picker: Option<String>,
    pub status: String,
    pub store_code: String,
    pub store_name: String,
    pub updated_at: Timestamp,
}

/// The (store, metal) identity of an existing line, used to compute
/// which required lines are still missing.
#[derive(Debug, Clone, FromRow)]
pub struct LineKeyRow {
    pub store_id: DbId,
    pub metal: String,
}

/// Field-level patch for a line. Omitted fields keep their stored value.
///
/// `picker` distinguishes an omitted field (`None`, keep) from an
/// explicit JSON `null` (`Some(None)`, clear). `status` rejects unknown
/// values at deserialization time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLine {
    #[serde(default, deserialize_with = "double_option")]
    pub picker: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<LineStatus>,
}

impl UpdateLine {
    /// True when the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.picker.is_none() && self.status.is_none()
    }
}

/// Wrap a present field in `Some`, so that an explicit JSON `null`
/// becomes `Some(None)` instead of collapsing into the outer `None`
/// that marks an absent field.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_picker_is_distinct_from_explicit_null() {
        let absent: UpdateLine = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(absent.picker, None);
        assert!(absent.is_empty());

        let cleared: UpdateLine =
            serde_json::from_value(serde_json::json!({"picker": null})).unwrap();
        assert_eq!(cleared.picker, Some(None));
        assert!(!cleared.is_empty());

        let set: UpdateLine =
            serde_json::from_value(serde_json::json!({"picker": "Jan"})).unwrap();
        assert_eq!(set.picker, Some(Some("Jan".into())));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result: Result<UpdateLine, _> =
            serde_json::from_value(serde_json::json!({"status": "GEDAAN"}));
        assert!(result.is_err());
    }
}

