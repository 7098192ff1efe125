//! Gallery routes mounted at `/videos`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::videos;
use crate::state::AppState;

/// ```text
/// GET  /                -> list_videos
/// POST /                -> create_video
/// GET  /{id}            -> get_video
/// GET  /{id}/artifact   -> get_artifact
/// POST /{id}/remix      -> remix_video
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(videos::list_videos).post(videos::create_video))
        .route("/{id}", get(videos::get_video))
        .route("/{id}/artifact", get(videos::get_artifact))
        .route("/{id}/remix", post(videos::remix_video))
}
