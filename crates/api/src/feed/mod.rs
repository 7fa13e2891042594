//! The change feed: bridges the in-process event bus to WebSocket
//! clients watching a run.

mod router;

pub use router::FeedRouter;
