use axum::routing::get;
use axum::Router;

use crate::handlers::preferences;
use crate::state::AppState;

/// Preference routes mounted at `/preferences`.
///
/// ```text
/// GET /sort-order -> get_sort_order
/// PUT /sort-order -> update_sort_order
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/sort-order",
        get(preferences::get_sort_order).put(preferences::update_sort_order),
    )
}
