//! Wire and cache types shared by the HTTP writer, the feed listener,
//! and the line cache.

use picklijst_core::picking::{LineStatus, Metal};
use picklijst_core::types::DbId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Cache rows
// ---------------------------------------------------------------------------

/// Display fields of a line's store, populated by a full load.
///
/// Feed events never carry these; a line appended from the feed shows an
/// empty store until the next reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreInfo {
    pub code: String,
    pub name: String,
}

/// One unit of work as held in the local cache.
#[derive(Debug, Clone)]
pub struct LineRow {
    pub id: DbId,
    pub run_id: DbId,
    pub store_id: DbId,
    pub metal: Metal,
    pub picker: Option<String>,
    pub status: LineStatus,
    /// Local-only join data; preserved across feed merges.
    pub store: Option<StoreInfo>,
}

impl LineRow {
    /// Store code used for display ordering; empty until the join is
    /// populated.
    pub fn store_code(&self) -> &str {
        self.store.as_ref().map(|s| s.code.as_str()).unwrap_or("")
    }
}

/// Row shape returned by the reconcile endpoint: the raw line flattened
/// with its store's display fields.
#[derive(Debug, Clone, Deserialize)]
pub struct LoadedLine {
    pub id: DbId,
    pub run_id: DbId,
    pub store_id: DbId,
    pub metal: Metal,
    pub picker: Option<String>,
    pub status: LineStatus,
    pub store_code: String,
    pub store_name: String,
}

impl From<LoadedLine> for LineRow {
    fn from(loaded: LoadedLine) -> Self {
        Self {
            id: loaded.id,
            run_id: loaded.run_id,
            store_id: loaded.store_id,
            metal: loaded.metal,
            picker: loaded.picker,
            status: loaded.status,
            store: Some(StoreInfo {
                code: loaded.store_code,
                name: loaded.store_name,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Patches
// ---------------------------------------------------------------------------

/// Field-level patch sent to the line endpoint.
///
/// `picker` distinguishes an omitted field (`None`) from an explicit
/// clear (`Some(None)`, serialized as JSON `null`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picker: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LineStatus>,
}

impl LinePatch {
    /// Patch that sets the picker (empty string is a valid name-in-progress).
    pub fn picker(value: impl Into<String>) -> Self {
        Self {
            picker: Some(Some(value.into())),
            ..Default::default()
        }
    }

    /// Patch that clears the picker.
    pub fn clear_picker() -> Self {
        Self {
            picker: Some(None),
            ..Default::default()
        }
    }

    /// Patch that sets the status.
    pub fn status(value: LineStatus) -> Self {
        Self {
            status: Some(value),
            ..Default::default()
        }
    }

    /// Coalesce a newer patch into this one; newer fields win.
    pub fn merge(&mut self, newer: LinePatch) {
        if newer.picker.is_some() {
            self.picker = newer.picker;
        }
        if newer.status.is_some() {
            self.status = newer.status;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.picker.is_none() && self.status.is_none()
    }
}

// ---------------------------------------------------------------------------
// Feed frames
// ---------------------------------------------------------------------------

/// What happened to a line, per the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Insert,
    Update,
    Delete,
}

/// Raw row values carried by insert/update events (no store join).
#[derive(Debug, Clone, Deserialize)]
pub struct FeedLine {
    pub id: DbId,
    pub run_id: DbId,
    pub store_id: DbId,
    pub metal: Metal,
    pub picker: Option<String>,
    pub status: LineStatus,
}

/// One change notification from the run's feed.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEvent {
    pub action: ChangeAction,
    pub run_id: DbId,
    pub line_id: DbId,
    pub line: Option<FeedLine>,
}

/// Frames arriving on the feed socket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    LineEvent(FeedEvent),
}

/// Frames sent to the feed socket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    Subscribe { run_id: DbId },
}
