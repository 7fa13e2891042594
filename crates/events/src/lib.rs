//! Picklijst change-event infrastructure.
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`LineEvent`] — a committed insert/update/delete of a picking line,
//!   scoped by its run. The WebSocket feed router subscribes to the bus
//!   and fans events out to clients watching that run.

pub mod bus;

pub use bus::{ChangeAction, EventBus, LineEvent};
