use axum::extract::State;
use axum::Json;
use solesync_db::models::announcement::Announcement;
use solesync_db::repositories::AnnouncementRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/announcements
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Announcement>>>> {
    let announcements = AnnouncementRepo::list_with_branch(&state.pool).await?;
    Ok(Json(DataResponse { data: announcements }))
}
