//! Handlers for picking runs: reconciliation and lookup.

use axum::extract::{Query, State};
use axum::Json;
use picklijst_core::error::CoreError;
use picklijst_core::picking::is_operating_weekday;
use picklijst_core::reconcile::{missing_line_keys, required_line_keys, LineKey};
use picklijst_core::types::RunDate;
use picklijst_db::models::line::LineWithStore;
use picklijst_db::models::run::PickingRun;
use picklijst_db::repositories::{LineRepo, RunRepo, TemplateRepo};
use picklijst_events::LineEvent;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /runs/reconcile`.
#[derive(Debug, Deserialize)]
pub struct ReconcileRequest {
    pub run_date: RunDate,
    pub weekday: i32,
}

/// Query parameters for `GET /runs`.
#[derive(Debug, Deserialize)]
pub struct RunQuery {
    pub run_date: RunDate,
}

/// Response payload for a reconciled run: the run row plus its complete,
/// sorted line set.
#[derive(Debug, serde::Serialize)]
pub struct ReconciledRun {
    pub run: PickingRun,
    pub lines: Vec<LineWithStore>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/runs/reconcile
///
/// Ensure the run for `run_date` exists and that every (store, metal)
/// pair required by the weekday template has exactly one line, then
/// return the full sorted line set.
///
/// Safe to call concurrently: run creation and line creation both use
/// conflict-ignore inserts, so two clients loading the same date settle
/// on identical rows. Partial inserts from a failed earlier call are
/// absorbed on retry.
pub async fn reconcile(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<ReconcileRequest>,
) -> AppResult<Json<DataResponse<ReconciledRun>>> {
    if !is_operating_weekday(input.weekday) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Weekday {} is not an operating day (expected 2-5)",
            input.weekday
        ))));
    }

    let run = RunRepo::get_or_create(&state.pool, input.run_date).await?;

    let store_ids = TemplateRepo::store_ids_for_weekday(&state.pool, input.weekday).await?;
    if store_ids.is_empty() {
        return Ok(Json(DataResponse {
            data: ReconciledRun {
                run,
                lines: Vec::new(),
            },
        }));
    }

    let required = required_line_keys(&store_ids);
    let existing: Vec<LineKey> = LineRepo::existing_keys(&state.pool, run.id, &store_ids)
        .await?
        .into_iter()
        .filter_map(|row| {
            let metal = row.metal.parse().ok()?;
            Some(LineKey {
                store_id: row.store_id,
                metal,
            })
        })
        .collect();

    let missing = missing_line_keys(&required, &existing);
    let created = LineRepo::insert_missing(&state.pool, run.id, &missing).await?;
    for line in created {
        state.event_bus.publish(LineEvent::inserted(line));
    }

    let lines = LineRepo::list_for_run_with_stores(&state.pool, run.id, &store_ids).await?;

    Ok(Json(DataResponse {
        data: ReconciledRun { run, lines },
    }))
}

/// GET /api/v1/runs?run_date=YYYY-MM-DD
///
/// Look up the run for a date without creating anything.
pub async fn get_run(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<RunQuery>,
) -> AppResult<Json<DataResponse<Option<PickingRun>>>> {
    let run = RunRepo::find_by_date(&state.pool, query.run_date).await?;
    Ok(Json(DataResponse { data: run }))
}
