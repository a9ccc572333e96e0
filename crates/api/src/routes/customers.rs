//! Route definitions for the `/customers` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::customers;
use crate::state::AppState;

/// Routes mounted at `/customers`.
///
/// ```text
/// POST /         -> create
/// GET  /         -> list (requires auth)
/// POST /login    -> login
/// GET  /{id}     -> get_by_id (requires auth, own record only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(customers::create).get(customers::list))
        .route("/login", post(customers::login))
        .route("/{id}", get(customers::get_by_id))
}
