use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use veo_gallery_core::codec::CodecError;
use veo_gallery_core::error::CoreError;
use veo_gallery_pipeline::GenerationError;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain errors of each crate and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A rejected or failed generation request.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// A stored artifact could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            },

            AppError::Generation(err) => match err {
                GenerationError::Busy => (StatusCode::CONFLICT, "CONFLICT", err.to_string()),
                GenerationError::EmptyPrompt => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                }
                other => {
                    tracing::error!(error = %other, "Generation error");
                    internal()
                }
            },

            AppError::Codec(err) => {
                tracing::error!(error = %err, "Stored artifact could not be decoded");
                internal()
            }

            AppError::Database(err) => classify_sqlx_error(err),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// `RowNotFound` maps to 404; everything else to 500 with a sanitized
/// message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
