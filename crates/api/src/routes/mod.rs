pub mod auth;
pub mod health;
pub mod lines;
pub mod runs;
pub mod stores;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                      line feed WebSocket (token via query param)
///
/// /auth/login              login (public)
/// /auth/refresh            refresh (public)
/// /auth/logout             logout (requires auth)
///
/// /stores                  list active stores
///
/// /runs                    look up a run by date (GET)
/// /runs/reconcile          ensure run + lines for a date (POST)
///
/// /lines/{id}              patch picker/status (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/auth", auth::router())
        .nest("/stores", stores::router())
        .nest("/runs", runs::router())
        .nest("/lines", lines::router())
}
