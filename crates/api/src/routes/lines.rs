//! Route definitions for picking lines.

use axum::routing::patch;
use axum::Router;

use crate::handlers::lines;
use crate::state::AppState;

/// Line routes mounted at `/lines`.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", patch(lines::update_line))
}
