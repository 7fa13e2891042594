//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`LineEvent`]s. It is
//! designed to be shared via `Arc<EventBus>` across the application.
//! Handlers publish after a successful database write; the feed router
//! subscribes and pushes events to WebSocket clients. Consuming an event
//! never triggers another write, so the feed cannot loop.

use picklijst_core::types::{DbId, Timestamp};
use picklijst_db::models::line::PickingLine;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// LineEvent
// ---------------------------------------------------------------------------

/// What happened to a picking line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Insert,
    Update,
    Delete,
}

/// A committed change to one picking line.
///
/// Carries the raw row for inserts and updates; deletes only carry the
/// id. The store join is never part of the payload — clients keep their
/// own display fields.
#[derive(Debug, Clone, Serialize)]
pub struct LineEvent {
    pub action: ChangeAction,
    /// Run the line belongs to; the feed is scoped by this.
    pub run_id: DbId,
    /// Id of the affected line.
    pub line_id: DbId,
    /// New row values (insert/update), absent for delete.
    pub line: Option<PickingLine>,
    /// When the event was published (UTC).
    pub timestamp: Timestamp,
}

impl LineEvent {
    /// A line was created (by reconciliation).
    pub fn inserted(line: PickingLine) -> Self {
        Self {
            action: ChangeAction::Insert,
            run_id: line.run_id,
            line_id: line.id,
            line: Some(line),
            timestamp: chrono::Utc::now(),
        }
    }

    /// A line was patched.
    pub fn updated(line: PickingLine) -> Self {
        Self {
            action: ChangeAction::Update,
            run_id: line.run_id,
            line_id: line.id,
            line: Some(line),
            timestamp: chrono::Utc::now(),
        }
    }

    /// A line disappeared (external cleanup; this app never deletes).
    pub fn deleted(run_id: DbId, line_id: DbId) -> Self {
        Self {
            action: ChangeAction::Delete,
            run_id,
            line_id,
            line: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`LineEvent`].
pub struct EventBus {
    sender: broadcast::Sender<LineEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are
    /// dropped and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// clients recover missed state on their next full reload.
    pub fn publish(&self, event: LineEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<LineEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
