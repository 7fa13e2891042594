/// Errors surfaced by the client layer.
///
/// All of these are per-operation and recoverable: a failed write is
/// reported and resolved by a reload, a failed feed connection is
/// retried with backoff.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the request.
    #[error("Server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The feed connection failed or produced an unreadable frame.
    #[error("Feed error: {0}")]
    Feed(String),
}
