//! Client-side sync layer for the picklijst service.
//!
//! A UI embedding this crate gets the three pieces the picking screen
//! needs:
//!
//! - [`cache::LineCache`] — the local copy of a run's lines, updated
//!   optimistically on edit and merged with incoming feed events.
//! - [`queue::EditQueue`] — per-line debounced persistence of field
//!   edits through a [`queue::LineWriter`].
//! - [`listener`] — a reconnecting WebSocket subscription to one run's
//!   change feed.
//!
//! The backend remains the source of truth: everything held here is a
//! cache that converges via the feed and full reloads.

pub mod cache;
pub mod error;
pub mod listener;
pub mod messages;
pub mod queue;
pub mod writer;

pub use cache::LineCache;
pub use error::ClientError;
pub use messages::{FeedEvent, LinePatch, LineRow, StoreInfo};
pub use queue::{EditQueue, LineWriter};
pub use writer::ApiClient;
