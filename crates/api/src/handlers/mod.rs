//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the repositories in `picklijst_db` and map
//! errors via [`AppError`](crate::error::AppError).

pub mod auth;
pub mod lines;
pub mod runs;
pub mod stores;
