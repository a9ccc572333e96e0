//! Route definitions for the `/appointments` resource.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::appointments;
use crate::state::AppState;

/// Routes mounted at `/appointments`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(appointments::create))
        .route("/customer/{cust_id}", get(appointments::upcoming_for_customer))
        .route(
            "/customer/{cust_id}/pending",
            delete(appointments::delete_pending_for_customer),
        )
        .route("/canceled/check", get(appointments::check_canceled_slot))
        .route("/{id}", delete(appointments::delete))
        .route("/{id}/cancel", patch(appointments::cancel))
}
