//! Orchestrator routes mounted at `/generation`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// ```text
/// GET    /          -> get_state
/// DELETE /          -> cancel_generation
/// POST   /dismiss   -> dismiss_error
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(generation::get_state).delete(generation::cancel_generation),
        )
        .route("/dismiss", post(generation::dismiss_error))
}
