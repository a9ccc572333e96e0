//! Handlers for the `/branches` resource.

use axum::extract::{Path, State};
use axum::Json;
use solesync_core::error::CoreError;
use solesync_db::models::branch::{Branch, BRANCH_TYPE_B};
use solesync_db::repositories::BranchRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/branches/b
pub async fn list_type_b(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Branch>>>> {
    let branches = BranchRepo::list_by_type(&state.pool, BRANCH_TYPE_B).await?;
    Ok(Json(DataResponse { data: branches }))
}

/// GET /api/branches/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Branch>>> {
    let branch = BranchRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Branch", id: id.clone() }))?;
    Ok(Json(DataResponse { data: branch }))
}
