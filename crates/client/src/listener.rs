//! WebSocket subscription to one run's change feed.
//!
//! [`FeedClient`] holds the connection configuration; [`connect`]
//! establishes a live [`FeedConnection`] scoped to a run. [`run_feed`]
//! drives the whole lifecycle: connect, forward events, reconnect with
//! exponential backoff when the connection drops, stop when cancelled.
//! Switching runs is a cancel + new `run_feed` call.
//!
//! [`connect`]: FeedClient::connect

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use picklijst_core::types::DbId;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use crate::error::ClientError;
use crate::messages::{ClientFrame, FeedEvent, ServerFrame};

/// Configuration handle for the feed endpoint.
pub struct FeedClient {
    ws_url: String,
    access_token: String,
}

/// A live, run-scoped feed connection.
pub struct FeedConnection {
    /// The run this connection is subscribed to.
    pub run_id: DbId,
    ws_stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl FeedClient {
    /// Create a client targeting the service's feed endpoint.
    ///
    /// * `ws_url` - WebSocket URL, e.g. `ws://host:3000/api/v1/ws`.
    /// * `access_token` - JWT passed as a query parameter on the
    ///   handshake (WebSocket clients cannot set a Bearer header).
    pub fn new(ws_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            access_token: access_token.into(),
        }
    }

    /// Connect and subscribe to `run_id`'s line feed.
    pub async fn connect(&self, run_id: DbId) -> Result<FeedConnection, ClientError> {
        let url = format!("{}?token={}", self.ws_url, self.access_token);

        let (mut ws_stream, _response) = connect_async(&url).await.map_err(|e| {
            ClientError::Feed(format!("Failed to connect to {}: {e}", self.ws_url))
        })?;

        let subscribe = serde_json::to_string(&ClientFrame::Subscribe { run_id })
            .expect("subscribe frame serializes");
        ws_stream
            .send(Message::Text(subscribe.into()))
            .await
            .map_err(|e| ClientError::Feed(format!("Failed to send subscribe frame: {e}")))?;

        tracing::info!(run_id, "Subscribed to line feed");

        Ok(FeedConnection { run_id, ws_stream })
    }
}

impl FeedConnection {
    /// Receive the next line event.
    ///
    /// Skips control frames and unknown payloads. Returns `Ok(None)` when
    /// the server closes the connection.
    pub async fn next_event(&mut self) -> Result<Option<FeedEvent>, ClientError> {
        while let Some(frame) = self.ws_stream.next().await {
            match frame {
                Ok(Message::Text(text)) => match serde_json::from_str::<ServerFrame>(&text) {
                    Ok(ServerFrame::LineEvent(event)) => return Ok(Some(event)),
                    Err(e) => {
                        tracing::debug!(error = %e, "Ignoring unreadable feed frame");
                    }
                },
                Ok(Message::Close(_)) => return Ok(None),
                Ok(_) => {
                    // Ping/Pong/Binary are not part of the feed protocol.
                }
                Err(e) => return Err(ClientError::Feed(format!("Feed receive error: {e}"))),
            }
        }
        Ok(None)
    }

    /// Close the connection gracefully.
    pub async fn close(mut self) {
        let _ = self.ws_stream.close(None).await;
    }
}

// ---------------------------------------------------------------------------
// Reconnection
// ---------------------------------------------------------------------------

/// Tunable parameters for the exponential-backoff strategy.
pub struct ReconnectConfig {
    /// Delay before the second connection attempt (the first is immediate).
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

/// Calculate the next backoff delay from the current delay and config.
///
/// The result is clamped to [`ReconnectConfig::max_delay`].
pub fn next_delay(current: Duration, config: &ReconnectConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}

/// Attempt to connect with exponential backoff between failures.
///
/// Returns `Some(connection)` once a connection succeeds, or `None` if
/// the `cancel` token is triggered first.
pub async fn reconnect_loop(
    client: &FeedClient,
    run_id: DbId,
    config: &ReconnectConfig,
    cancel: &CancellationToken,
) -> Option<FeedConnection> {
    let mut delay = config.initial_delay;
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(run_id, "Feed connect cancelled");
                return None;
            }
            result = client.connect(run_id) => {
                match result {
                    Ok(conn) => {
                        if attempt > 1 {
                            tracing::info!(run_id, attempt, "Feed reconnected");
                        }
                        return Some(conn);
                    }
                    Err(e) => {
                        tracing::warn!(
                            run_id,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "Feed connect failed, backing off",
                        );
                    }
                }
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => return None,
            _ = tokio::time::sleep(delay) => {}
        }
        delay = next_delay(delay, config);
    }
}

/// Drive the feed for one run until cancelled.
///
/// Connects (retrying with backoff), forwards every event into `sink`,
/// and reconnects when the connection drops. The receiving side merges
/// the events into a [`LineCache`](crate::cache::LineCache) — forwarding
/// is the listener's only job, so feed traffic can never trigger writes.
pub async fn run_feed(
    client: &FeedClient,
    run_id: DbId,
    config: &ReconnectConfig,
    cancel: &CancellationToken,
    sink: mpsc::UnboundedSender<FeedEvent>,
) {
    loop {
        let Some(mut conn) = reconnect_loop(client, run_id, config, cancel).await else {
            return;
        };

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    conn.close().await;
                    return;
                }
                event = conn.next_event() => match event {
                    Ok(Some(event)) => {
                        if sink.send(event).is_err() {
                            // Receiver dropped: the screen went away.
                            return;
                        }
                    }
                    Ok(None) => {
                        tracing::info!(run_id, "Feed closed by server, reconnecting");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(run_id, error = %e, "Feed errored, reconnecting");
                        break;
                    }
                }
            }
        }
    }
}
