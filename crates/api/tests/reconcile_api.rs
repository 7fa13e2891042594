//! Integration tests for run reconciliation.
//!
//! Covers the full contract: lazy run creation, template-driven line
//! creation (two metals per store), idempotency under repeated calls,
//! preservation of pre-existing edits, and the empty-template early exit.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, seed_store, seed_template, seed_user, token_for};
use sqlx::PgPool;

async fn line_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM picking_lines")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tuesday_with_two_stores_yields_four_pending_lines(pool: PgPool) {
    let user = seed_user(&pool, "jan@example.test").await;
    let s1 = seed_store(&pool, "S1", "Store One").await;
    let s2 = seed_store(&pool, "S2", "Store Two").await;
    seed_template(&pool, 2, s1).await;
    seed_template(&pool, 2, s2).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/runs/reconcile",
        serde_json::json!({"run_date": "2024-06-04", "weekday": 2}),
        &token_for(&user),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["run"]["run_date"], "2024-06-04");

    let lines = json["data"]["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 4);

    let keys: Vec<(String, String)> = lines
        .iter()
        .map(|l| {
            (
                l["store_code"].as_str().unwrap().to_string(),
                l["metal"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        keys,
        vec![
            ("S1".into(), "ZILVER".into()),
            ("S1".into(), "STAAL".into()),
            ("S2".into(), "ZILVER".into()),
            ("S2".into(), "STAAL".into()),
        ]
    );

    for line in lines {
        assert_eq!(line["status"], "TE_DOEN");
        assert!(line["picker"].is_null());
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reconciling_twice_creates_no_duplicates(pool: PgPool) {
    let user = seed_user(&pool, "jan@example.test").await;
    let s1 = seed_store(&pool, "S1", "Store One").await;
    seed_template(&pool, 2, s1).await;
    let token = token_for(&user);
    let body = serde_json::json!({"run_date": "2024-06-04", "weekday": 2});

    let app = common::build_test_app(pool.clone());
    let first = post_json_auth(app, "/api/v1/runs/reconcile", body.clone(), &token).await;
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_json(first).await;

    let app = common::build_test_app(pool.clone());
    let second = post_json_auth(app, "/api/v1/runs/reconcile", body, &token).await;
    assert_eq!(second.status(), StatusCode::OK);
    let second = body_json(second).await;

    // Same run, same line ids, nothing new in the table.
    assert_eq!(first["data"]["run"]["id"], second["data"]["run"]["id"]);
    let ids = |v: &serde_json::Value| {
        v["data"]["lines"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"].as_i64().unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(line_count(&pool).await, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reconcile_preserves_existing_edits(pool: PgPool) {
    let user = seed_user(&pool, "jan@example.test").await;
    let s1 = seed_store(&pool, "S1", "Store One").await;
    seed_template(&pool, 2, s1).await;
    let token = token_for(&user);
    let body = serde_json::json!({"run_date": "2024-06-04", "weekday": 2});

    let app = common::build_test_app(pool.clone());
    let first = post_json_auth(app, "/api/v1/runs/reconcile", body.clone(), &token).await;
    let first = body_json(first).await;
    let line_id = first["data"]["lines"][0]["id"].as_i64().unwrap();

    sqlx::query("UPDATE picking_lines SET picker = 'Jan', status = 'BEZIG' WHERE id = $1")
        .bind(line_id)
        .execute(&pool)
        .await
        .unwrap();

    let app = common::build_test_app(pool);
    let second = post_json_auth(app, "/api/v1/runs/reconcile", body, &token).await;
    let second = body_json(second).await;

    let edited = second["data"]["lines"]
        .as_array()
        .unwrap()
        .iter()
        .find(|l| l["id"].as_i64() == Some(line_id))
        .expect("edited line still present");
    assert_eq!(edited["picker"], "Jan");
    assert_eq!(edited["status"], "BEZIG");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_weekday_template_creates_no_lines(pool: PgPool) {
    let user = seed_user(&pool, "jan@example.test").await;
    // Stores exist, but nothing is templated for Friday.
    let s1 = seed_store(&pool, "S1", "Store One").await;
    seed_template(&pool, 2, s1).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/runs/reconcile",
        serde_json::json!({"run_date": "2024-06-07", "weekday": 5}),
        &token_for(&user),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["lines"].as_array().unwrap().is_empty());
    assert_eq!(line_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_operating_weekday_is_rejected_before_any_write(pool: PgPool) {
    let user = seed_user(&pool, "jan@example.test").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/runs/reconcile",
        serde_json::json!({"run_date": "2024-06-02", "weekday": 7}),
        &token_for(&user),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let runs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM picking_runs")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(runs, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reconcile_requires_authentication(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::post_json(
        app,
        "/api/v1/runs/reconcile",
        serde_json::json!({"run_date": "2024-06-04", "weekday": 2}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn run_lookup_does_not_create(pool: PgPool) {
    let user = seed_user(&pool, "jan@example.test").await;
    let token = token_for(&user);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/runs?run_date=2024-06-04", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"].is_null());

    let runs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM picking_runs")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(runs, 0);
}
