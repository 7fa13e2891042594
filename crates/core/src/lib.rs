//! Shared domain types and logic for the picklijst picking tracker.
//!
//! This crate is deliberately free of I/O: it holds the id/timestamp
//! aliases, the domain error enum, the picking vocabulary (metals,
//! statuses, operating weekdays), and the pure reconciliation planning
//! that decides which lines a run is missing.

pub mod error;
pub mod picking;
pub mod reconcile;
pub mod types;
