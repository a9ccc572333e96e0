//! Handler for branch unavailability lookups.

use axum::extract::{Query, State};
use axum::Json;
use solesync_core::appointment::parse_date;
use solesync_db::models::unavailability::Unavailability;
use solesync_db::repositories::UnavailabilityRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::non_blank;
use crate::query::BranchDateParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/unavailability?date=&branch_id=
pub async fn list_for_branch(
    State(state): State<AppState>,
    Query(params): Query<BranchDateParams>,
) -> AppResult<Json<DataResponse<Vec<Unavailability>>>> {
    let (Some(branch_id), Some(date)) = (non_blank(params.branch_id), non_blank(params.date))
    else {
        return Err(AppError::BadRequest("branch_id and date are required".into()));
    };
    let date = parse_date(&date)?;

    let windows = UnavailabilityRepo::list_for_branch_on(&state.pool, &branch_id, date).await?;
    Ok(Json(DataResponse { data: windows }))
}
