//! Per-line debounced persistence of field edits.
//!
//! Every edit lands in the local cache immediately; the backend write is
//! deferred until the line has been quiet for the debounce window. Each
//! line has its own window: editing one line never delays another, and a
//! burst of keystrokes on one line collapses into a single write carrying
//! the final coalesced patch.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use picklijst_core::types::DbId;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::cache::LineCache;
use crate::error::ClientError;
use crate::messages::LinePatch;

/// Quiet period before a line's pending patch is written. Long enough to
/// coalesce rapid keystrokes, short enough to feel immediate.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Persistence seam for the queue. Production uses the HTTP client;
/// tests inject a recorder.
#[async_trait]
pub trait LineWriter: Send + Sync + 'static {
    async fn write_line(&self, id: DbId, patch: LinePatch) -> Result<(), ClientError>;
}

/// A write that failed after its debounce window.
///
/// The optimistic cache state is deliberately not rolled back field by
/// field; the subscriber should notify the user and trigger a full
/// reload to resync with backend truth.
#[derive(Debug)]
pub struct WriteFailure {
    pub line_id: DbId,
    pub message: String,
}

struct PendingEdit {
    patch: LinePatch,
    /// Monotonic marker: only the flush task spawned for the latest edit
    /// may take this entry.
    generation: u64,
    timer: JoinHandle<()>,
}

/// Debounced, per-line edit queue in front of a [`LineWriter`].
pub struct EditQueue<W: LineWriter> {
    writer: Arc<W>,
    cache: Arc<Mutex<LineCache>>,
    pending: Arc<Mutex<HashMap<DbId, PendingEdit>>>,
    generations: AtomicU64,
    debounce: Duration,
    failure_tx: mpsc::UnboundedSender<WriteFailure>,
}

impl<W: LineWriter> EditQueue<W> {
    /// Create a queue with the default debounce window. Returns the queue
    /// and the receiver on which write failures are reported.
    pub fn new(
        writer: W,
        cache: Arc<Mutex<LineCache>>,
    ) -> (Self, mpsc::UnboundedReceiver<WriteFailure>) {
        Self::with_debounce(writer, cache, DEFAULT_DEBOUNCE)
    }

    /// Create a queue with an explicit debounce window.
    pub fn with_debounce(
        writer: W,
        cache: Arc<Mutex<LineCache>>,
        debounce: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<WriteFailure>) {
        let (failure_tx, failure_rx) = mpsc::unbounded_channel();
        (
            Self {
                writer: Arc::new(writer),
                cache,
                pending: Arc::new(Mutex::new(HashMap::new())),
                generations: AtomicU64::new(0),
                debounce,
                failure_tx,
            },
            failure_rx,
        )
    }

    /// Record a field edit: apply it to the cache now, persist it after
    /// the line's quiet period.
    ///
    /// A new edit to the same line coalesces into the pending patch and
    /// restarts that line's timer; other lines' timers are untouched.
    pub fn edit(&self, id: DbId, patch: LinePatch) {
        if patch.is_empty() {
            return;
        }

        self.cache
            .lock()
            .expect("cache lock poisoned")
            .apply_patch(id, &patch);

        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;

        let mut pending = self.pending.lock().expect("pending lock poisoned");
        let merged = match pending.remove(&id) {
            Some(previous) => {
                previous.timer.abort();
                let mut merged = previous.patch;
                merged.merge(patch);
                merged
            }
            None => patch,
        };
        let timer = self.spawn_flush(id, generation);
        pending.insert(
            id,
            PendingEdit {
                patch: merged,
                generation,
                timer,
            },
        );
    }

    /// Number of lines with an unflushed pending edit.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().expect("pending lock poisoned").len()
    }

    fn spawn_flush(&self, id: DbId, generation: u64) -> JoinHandle<()> {
        let writer = Arc::clone(&self.writer);
        let pending = Arc::clone(&self.pending);
        let failure_tx = self.failure_tx.clone();
        let debounce = self.debounce;

        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            // Take the patch only if no newer edit replaced this timer in
            // the window between its wakeup and its abort.
            let patch = {
                let mut pending = pending.lock().expect("pending lock poisoned");
                match pending.get(&id) {
                    Some(entry) if entry.generation == generation => {
                        pending.remove(&id).map(|entry| entry.patch)
                    }
                    _ => None,
                }
            };
            let Some(patch) = patch else {
                return;
            };

            if let Err(e) = writer.write_line(id, patch).await {
                tracing::warn!(line_id = id, error = %e, "Line write failed; resync advised");
                let _ = failure_tx.send(WriteFailure {
                    line_id: id,
                    message: e.to_string(),
                });
            }
        })
    }
}
