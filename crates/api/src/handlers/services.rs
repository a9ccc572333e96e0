//! Handlers for the `/services` catalog.

use axum::extract::{Path, State};
use axum::Json;
use solesync_core::error::CoreError;
use solesync_db::models::service::Service;
use solesync_db::repositories::ServiceRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/services
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Service>>>> {
    let services = ServiceRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: services }))
}

/// GET /api/services/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Service>>> {
    let service = ServiceRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Service", id: id.clone() }))?;
    Ok(Json(DataResponse { data: service }))
}
