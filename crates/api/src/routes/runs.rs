//! Route definitions for picking runs.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::runs;
use crate::state::AppState;

/// Run routes mounted at `/runs`.
///
/// ```text
/// GET  /           -> get_run (lookup by date, no side effects)
/// POST /reconcile  -> reconcile (ensure run + template lines exist)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(runs::get_run))
        .route("/reconcile", post(runs::reconcile))
}
