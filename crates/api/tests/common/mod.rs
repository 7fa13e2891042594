//! Shared helpers for API integration tests.
//!
//! Builds the application router exactly as production does (same
//! middleware stack via `build_app_router`) and provides request/seed
//! helpers. Not every test file uses every helper.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use picklijst_api::auth::jwt::{generate_access_token, JwtConfig};
use picklijst_api::auth::password::hash_password;
use picklijst_api::config::ServerConfig;
use picklijst_api::router::build_app_router;
use picklijst_api::state::AppState;
use picklijst_api::ws::WsManager;
use picklijst_db::models::user::{CreateUser, User};
use picklijst_db::repositories::UserRepo;
use picklijst_events::EventBus;

/// Password used for every seeded test user.
pub const TEST_PASSWORD: &str = "pick-it-2024";

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager: Arc::new(WsManager::new()),
        event_bus: Arc::new(EventBus::default()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] and return the row.
pub async fn seed_user(pool: &PgPool, email: &str) -> User {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash,
            display_name: "Test Picker".to_string(),
            role: "picker".to_string(),
        },
    )
    .await
    .expect("user insert should succeed")
}

/// Issue an access token for a seeded user, signed with the test secret.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_config().jwt)
        .expect("token generation should succeed")
}

/// Insert a store and return its id.
pub async fn seed_store(pool: &PgPool, code: &str, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO stores (code, name) VALUES ($1, $2) RETURNING id")
        .bind(code)
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("store insert should succeed")
}

/// Require `store_id` on `weekday`.
pub async fn seed_template(pool: &PgPool, weekday: i32, store_id: i64) {
    sqlx::query("INSERT INTO picking_templates (weekday, store_id) VALUES ($1, $2)")
        .bind(weekday)
        .bind(store_id)
        .execute(pool)
        .await
        .expect("template insert should succeed");
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

fn build_request(
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// GET without authentication.
pub async fn get(app: Router, path: &str) -> Response {
    app.oneshot(build_request(Method::GET, path, None, None))
        .await
        .unwrap()
}

/// GET with a Bearer token.
pub async fn get_auth(app: Router, path: &str, token: &str) -> Response {
    app.oneshot(build_request(Method::GET, path, Some(token), None))
        .await
        .unwrap()
}

/// POST a JSON body without authentication.
pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response {
    app.oneshot(build_request(Method::POST, path, None, Some(body)))
        .await
        .unwrap()
}

/// POST a JSON body with a Bearer token.
pub async fn post_json_auth(
    app: Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    app.oneshot(build_request(Method::POST, path, Some(token), Some(body)))
        .await
        .unwrap()
}

/// POST with a Bearer token and no body.
pub async fn post_auth(app: Router, path: &str, token: &str) -> Response {
    app.oneshot(build_request(Method::POST, path, Some(token), None))
        .await
        .unwrap()
}

/// PATCH a JSON body with a Bearer token.
pub async fn patch_json_auth(
    app: Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    app.oneshot(build_request(Method::PATCH, path, Some(token), Some(body)))
        .await
        .unwrap()
}

/// PATCH a JSON body without authentication.
pub async fn patch_json(app: Router, path: &str, body: serde_json::Value) -> Response {
    app.oneshot(build_request(Method::PATCH, path, None, Some(body)))
        .await
        .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
