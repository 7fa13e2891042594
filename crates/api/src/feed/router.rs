//! Event-to-feed routing.
//!
//! [`FeedRouter`] subscribes to the line event bus and pushes each event
//! to the WebSocket connections subscribed to that event's run. Routing
//! is a pure fan-out: consuming an event never issues a database write,
//! so the feed cannot loop back into itself.

use std::sync::Arc;

use axum::extract::ws::Message;
use picklijst_events::LineEvent;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::ws::WsManager;

/// Outbound feed frame. The payload is the raw line row — deliberately
/// without the store join, which clients retain locally.
#[derive(Debug, Serialize)]
struct FeedFrame<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    event: &'a LineEvent,
}

/// Routes line events to run-scoped WebSocket connections.
pub struct FeedRouter {
    ws_manager: Arc<WsManager>,
}

impl FeedRouter {
    /// Create a new router delivering through the given connection manager.
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the main routing loop.
    ///
    /// Subscribes to the event bus via `receiver` and processes each event.
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](picklijst_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<LineEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.route_event(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Feed router lagged; clients resync on reload");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, feed router shutting down");
                    break;
                }
            }
        }
    }

    /// Serialize one event and fan it out to the subscribed connections.
    async fn route_event(&self, event: &LineEvent) {
        let frame = FeedFrame {
            kind: "line_event",
            event,
        };
        let text = match serde_json::to_string(&frame) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize feed frame");
                return;
            }
        };

        let delivered = self
            .ws_manager
            .send_to_run(event.run_id, Message::Text(text.into()))
            .await;
        tracing::debug!(
            run_id = event.run_id,
            line_id = event.line_id,
            delivered,
            "Routed line event"
        );
    }
}
