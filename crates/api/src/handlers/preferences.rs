//! Handlers for client-local preferences.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use veo_gallery_core::sort::SortKey;
use veo_gallery_db::repositories::PreferenceRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SortOrderPreference {
    pub sort_order: SortKey,
}

/// Body of `PUT /preferences/sort-order`.
#[derive(Debug, Deserialize)]
pub struct UpdateSortOrder {
    pub sort_order: String,
}

/// GET /api/v1/preferences/sort-order
pub async fn get_sort_order(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let sort_order = *state.sort_order.read().await;
    Ok(Json(DataResponse {
        data: SortOrderPreference { sort_order },
    }))
}

/// PUT /api/v1/preferences/sort-order
///
/// Persist the gallery sort order. Unknown values are rejected with 400.
pub async fn update_sort_order(
    State(state): State<AppState>,
    Json(input): Json<UpdateSortOrder>,
) -> AppResult<impl IntoResponse> {
    let sort_order: SortKey = input.sort_order.parse()?;
    PreferenceRepo::save_sort_key(&state.pool, sort_order).await?;
    *state.sort_order.write().await = sort_order;

    tracing::info!(sort_order = %sort_order, "Sort order preference updated");

    Ok(Json(DataResponse {
        data: SortOrderPreference { sort_order },
    }))
}
