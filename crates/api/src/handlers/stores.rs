//! Handlers for the store catalog (read-only).

use axum::extract::State;
use axum::Json;
use picklijst_db::models::store::Store;
use picklijst_db::repositories::StoreRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/stores
///
/// List active stores, ordered by code.
pub async fn list_stores(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Store>>>> {
    let stores = StoreRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: stores }))
}
