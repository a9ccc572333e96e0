//! Handler for `/dates`: milestone timestamps plus the derived timeline.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use solesync_core::error::CoreError;
use solesync_core::tracking::{current_stage, timeline, TimelineEntry, TrackingStage};
use solesync_db::models::dates::DatesRecord;
use solesync_db::repositories::DatesRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthCustomer;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DatesResponse {
    #[serde(flatten)]
    pub dates: DatesRecord,
    pub timeline: Vec<TimelineEntry>,
    /// Ordinal of the furthest stage reached.
    pub current_status: Option<usize>,
    pub current_stage: Option<TrackingStage>,
}

impl From<DatesRecord> for DatesResponse {
    fn from(dates: DatesRecord) -> Self {
        let milestones = dates.milestones();
        let stage = current_stage(&milestones);
        Self {
            timeline: timeline(&milestones),
            current_status: stage.map(TrackingStage::ordinal),
            current_stage: stage,
            dates,
        }
    }
}

/// GET /api/dates/{line_item_id}
///
/// Only the owning customer may read a line item's milestones.
pub async fn get_by_line_item(
    auth: AuthCustomer,
    State(state): State<AppState>,
    Path(line_item_id): Path<String>,
) -> AppResult<Json<DataResponse<DatesResponse>>> {
    let dates = DatesRepo::find_by_line_item(&state.pool, &line_item_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Dates for line item",
                id: line_item_id.clone(),
            })
        })?;

    auth.ensure_owner(&dates.cust_id)?;

    Ok(Json(DataResponse { data: dates.into() }))
}
