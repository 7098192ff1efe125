//! Handlers for observing and controlling the generation job slot.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use veo_gallery_core::error::CoreError;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/generation
///
/// Current orchestrator state (`idle`, `running` with its phase, or
/// `failed` with the user-facing messages).
pub async fn get_state(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.orchestrator.state(),
    }))
}

/// DELETE /api/v1/generation
///
/// Cancel the running job. Returns 202 since the run stops at its next
/// suspension point, or 409 when nothing is running.
pub async fn cancel_generation(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    if !state.orchestrator.cancel_current() {
        return Err(CoreError::Conflict("No generation job is running".to_string()).into());
    }

    tracing::info!("Generation cancel requested");

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: state.orchestrator.state(),
        }),
    ))
}

/// POST /api/v1/generation/dismiss
///
/// Clear a failed state back to idle. Idempotent.
pub async fn dismiss_error(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    if state.orchestrator.dismiss_error() {
        tracing::debug!("Generation error dismissed");
    }

    Ok(Json(DataResponse {
        data: state.orchestrator.state(),
    }))
}
