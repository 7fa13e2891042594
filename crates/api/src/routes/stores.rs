//! Route definitions for the store catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::stores;
use crate::state::AppState;

/// Store routes mounted at `/stores`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(stores::list_stores))
}
