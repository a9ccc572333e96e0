//! Route definitions for the `/branches` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::branches;
use crate::state::AppState;

/// Routes mounted at `/branches`.
///
/// ```text
/// GET /b     -> list_type_b
/// GET /{id}  -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/b", get(branches::list_type_b))
        .route("/{id}", get(branches::get_by_id))
}
