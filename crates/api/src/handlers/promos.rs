use axum::extract::State;
use axum::Json;
use solesync_db::models::promo::Promo;
use solesync_db::repositories::PromoRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/promos
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Promo>>>> {
    let promos = PromoRepo::list_with_branch(&state.pool).await?;
    Ok(Json(DataResponse { data: promos }))
}
