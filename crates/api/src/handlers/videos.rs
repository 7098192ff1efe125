//! Handlers for the gallery: listing, inspecting and generating videos.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use veo_gallery_core::codec;
use veo_gallery_core::error::CoreError;
use veo_gallery_core::record::Record;
use veo_gallery_core::sort::SortKey;
use veo_gallery_core::types::{RecordId, Timestamp};
use veo_gallery_pipeline::{GenerationRequest, OrchestratorState};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /videos`.
#[derive(Debug, Deserialize)]
pub struct ListVideosParams {
    /// One of `date-desc`, `date-asc`, `title-asc`, `title-desc`.
    pub sort: Option<String>,
}

/// A gallery entry without its payload.
#[derive(Debug, Serialize)]
pub struct VideoSummary {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub media_type: String,
    pub created_at: Timestamp,
}

impl From<&Record> for VideoSummary {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id(),
            title: record.title().to_string(),
            description: record.description().to_string(),
            media_type: record.artifact().media_type().to_string(),
            created_at: record.created_at(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateVideoRequest {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct RemixVideoRequest {
    /// Edited description of the origin record; becomes the new prompt.
    pub description: String,
}

/// Body returned when a generation run has been accepted.
#[derive(Debug, Serialize)]
pub struct GenerationAccepted {
    pub state: OrchestratorState,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_record(state: &AppState, id: RecordId) -> AppResult<Arc<Record>> {
    let record = state.orchestrator.gallery().read().await.get(id);
    record.ok_or_else(|| {
        CoreError::NotFound {
            entity: "Video",
            id: id.to_string(),
        }
        .into()
    })
}

fn accepted(state: &AppState) -> impl IntoResponse {
    (
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: GenerationAccepted {
                state: state.orchestrator.state(),
            },
        }),
    )
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/videos?sort=
///
/// List the gallery in the requested order, falling back to the saved sort
/// preference.
pub async fn list_videos(
    State(state): State<AppState>,
    Query(params): Query<ListVideosParams>,
) -> AppResult<impl IntoResponse> {
    let key: SortKey = match params.sort.as_deref() {
        Some(raw) => raw.parse()?,
        None => *state.sort_order.read().await,
    };

    let summaries: Vec<VideoSummary> = state
        .orchestrator
        .gallery()
        .read()
        .await
        .view_ordered_by(key)
        .iter()
        .map(|record| VideoSummary::from(record.as_ref()))
        .collect();

    Ok(Json(DataResponse { data: summaries }))
}

/// GET /api/v1/videos/{id}
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<impl IntoResponse> {
    let record = find_record(&state, id).await?;
    Ok(Json(DataResponse {
        data: Record::clone(&record),
    }))
}

/// GET /api/v1/videos/{id}/artifact
///
/// Stream the decoded video with its media type.
pub async fn get_artifact(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<impl IntoResponse> {
    let record = find_record(&state, id).await?;
    let bytes = codec::decode(record.artifact())?;

    Ok((
        [(header::CONTENT_TYPE, record.artifact().media_type().to_string())],
        bytes,
    ))
}

/// POST /api/v1/videos
///
/// Start generating a video from a fresh prompt. Returns 202 once the job
/// slot is claimed; progress is reported by `GET /api/v1/generation`.
pub async fn create_video(
    State(state): State<AppState>,
    Json(input): Json<CreateVideoRequest>,
) -> AppResult<impl IntoResponse> {
    state
        .orchestrator
        .start(GenerationRequest::new(input.prompt))?;

    Ok(accepted(&state))
}

/// POST /api/v1/videos/{id}/remix
///
/// Start generating a new video from an edited description of `{id}`.
pub async fn remix_video(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(input): Json<RemixVideoRequest>,
) -> AppResult<impl IntoResponse> {
    let origin = find_record(&state, id).await?;

    state
        .orchestrator
        .start(GenerationRequest::remix(input.description, origin.title()))?;

    tracing::info!(origin_id = %origin.id(), "Remix requested");

    Ok(accepted(&state))
}
