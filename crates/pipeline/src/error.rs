use std::time::Duration;

use veo_gallery_core::codec::CodecError;
use veo_gallery_genai::client::TransportError;

/// Lines shown to the user whenever a run ends in the failed state.
pub const USER_FACING_MESSAGES: [&str; 2] = [
    "Video generation failed.",
    "Please check your API key and try again.",
];

/// Why a generation run did not produce a record.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("A generation job is already running")]
    Busy,

    #[error("Job submission failed: {0}")]
    SubmitFailed(#[source] TransportError),

    #[error("Job polling failed: {0}")]
    PollFailed(#[source] TransportError),

    /// The remote service reported the job as failed.
    #[error("Generation job failed: {0}")]
    JobFailed(String),

    /// The job finished without producing any artifact.
    #[error("Generation job finished without producing a video")]
    EmptyResult,

    #[error("Artifact download failed{}: {source}", status_suffix(.status_code))]
    FetchFailed {
        status_code: Option<u16>,
        source: TransportError,
    },

    #[error("Artifact encoding failed: {0}")]
    Codec(#[from] CodecError),

    #[error("Job still pending after {attempts} polls ({elapsed:?})")]
    Timeout { attempts: u32, elapsed: Duration },

    #[error("Generation was cancelled")]
    Cancelled,
}

impl GenerationError {
    /// Whether this error puts the orchestrator into the failed state.
    ///
    /// Rejected requests never started a run, and a cancelled run was
    /// stopped on purpose.
    pub fn is_run_failure(&self) -> bool {
        !matches!(
            self,
            GenerationError::EmptyPrompt | GenerationError::Busy | GenerationError::Cancelled
        )
    }
}

fn status_suffix(status_code: &Option<u16>) -> String {
    status_code
        .map(|code| format!(" (HTTP {code})"))
        .unwrap_or_default()
}
