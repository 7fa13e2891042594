//! Handler for patching a picking line.

use axum::extract::{Path, State};
use axum::Json;
use picklijst_core::error::CoreError;
use picklijst_core::types::DbId;
use picklijst_db::models::audit::CreateLineAudit;
use picklijst_db::models::line::{PickingLine, UpdateLine};
use picklijst_db::repositories::{AuditRepo, LineRepo};
use picklijst_events::LineEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// PATCH /api/v1/lines/{id}
///
/// Apply a field-level patch (`picker` and/or `status`) to one line.
/// Only the supplied fields change; an explicit `picker: null` clears
/// the picker.
///
/// After a successful update an audit snapshot is appended and the
/// change is published on the event bus. The audit write is best-effort:
/// its failure is logged and never alters the success response.
pub async fn update_line(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(patch): Json<UpdateLine>,
) -> AppResult<Json<DataResponse<PickingLine>>> {
    if patch.is_empty() {
        return Err(AppError::BadRequest(
            "Patch must contain at least one of: picker, status".into(),
        ));
    }

    let line = LineRepo::update(&state.pool, id, &patch)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "picking line",
            id,
        }))?;

    let audit = CreateLineAudit::snapshot(&line, Some(user.user_id));
    if let Err(e) = AuditRepo::insert(&state.pool, &audit).await {
        tracing::warn!(line_id = line.id, error = %e, "Audit insert failed; line update stands");
    }

    state.event_bus.publish(LineEvent::updated(line.clone()));

    Ok(Json(DataResponse { data: line }))
}
