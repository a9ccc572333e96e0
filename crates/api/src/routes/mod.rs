pub mod appointments;
pub mod branches;
pub mod customers;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /customers                               register (POST), list (GET, auth)
/// /customers/login                         login (POST)
/// /customers/{id}                          own record (GET, auth)
///
/// /appointments                            book (POST)
/// /appointments/customer/{cust_id}         upcoming appointment (GET)
/// /appointments/customer/{cust_id}/pending delete pending (DELETE)
/// /appointments/canceled/check             previously canceled slot (GET)
/// /appointments/{id}                       delete (DELETE)
/// /appointments/{id}/cancel                cancel (PATCH)
///
/// /branches/b                              type B branches (GET)
/// /branches/{id}                           one branch (GET)
///
/// /services                                catalog (GET)
/// /services/{id}                           one service (GET)
///
/// /line-items/customer/{cust_id}           customer's line items (GET)
/// /line-items/{id}                         one line item (GET)
///
/// /dates/{line_item_id}                    milestones + timeline (GET, auth)
///
/// /announcements                           list (GET)
/// /promos                                  list (GET)
/// /unavailability?branch_id=&date=         branch closures (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/customers", customers::router())
        .nest("/appointments", appointments::router())
        .nest("/branches", branches::router())
        .route("/services", get(handlers::services::list))
        .route("/services/{id}", get(handlers::services::get_by_id))
        .route(
            "/line-items/customer/{cust_id}",
            get(handlers::line_items::list_for_customer),
        )
        .route("/line-items/{id}", get(handlers::line_items::get_by_id))
        .route(
            "/dates/{line_item_id}",
            get(handlers::dates::get_by_line_item),
        )
        .route("/announcements", get(handlers::announcements::list))
        .route("/promos", get(handlers::promos::list))
        .route(
            "/unavailability",
            get(handlers::unavailability::list_for_branch),
        )
}
