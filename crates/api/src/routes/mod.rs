pub mod generation;
pub mod health;
pub mod preferences;
pub mod videos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /videos                      list (?sort=), create (POST)
/// /videos/{id}                 get one record incl. data URI
/// /videos/{id}/artifact        decoded video bytes
/// /videos/{id}/remix           start a remix (POST)
///
/// /generation                  orchestrator state (GET), cancel (DELETE)
/// /generation/dismiss          clear a failed state (POST)
///
/// /preferences/sort-order      get, update (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/videos", videos::router())
        .nest("/generation", generation::router())
        .nest("/preferences", preferences::router())
}
