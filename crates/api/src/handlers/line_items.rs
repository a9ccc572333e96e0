//! Handlers for the `/line-items` resource.

use axum::extract::{Path, State};
use axum::Json;
use solesync_core::error::CoreError;
use solesync_db::models::line_item::LineItem;
use solesync_db::repositories::LineItemRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/line-items/customer/{cust_id}
pub async fn list_for_customer(
    State(state): State<AppState>,
    Path(cust_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<LineItem>>>> {
    let items = LineItemRepo::list_for_customer(&state.pool, &cust_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/line-items/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<LineItem>>> {
    let item = LineItemRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Line item",
                id: id.clone(),
            })
        })?;
    Ok(Json(DataResponse { data: item }))
}
