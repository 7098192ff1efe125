//! Transport abstraction between the orchestrator and the generation
//! service.
//!
//! [`RemoteJobClient`] makes one call per remote operation and never
//! retries. Polling cadence and timeouts belong to the orchestrator.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

/// Aspect ratio requested for every generated video.
pub const DEFAULT_ASPECT_RATIO: &str = "16:9";
/// Number of videos requested per job.
pub const DEFAULT_SAMPLE_COUNT: u32 = 1;

/// Fixed options sent alongside each prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    pub aspect_ratio: String,
    pub sample_count: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            sample_count: DEFAULT_SAMPLE_COUNT,
        }
    }
}

/// Opaque token naming one in-flight remote job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where one produced artifact can be downloaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocator {
    pub uri: String,
    /// Media type reported by the service, if any.
    pub media_type: Option<String>,
}

/// The outcome of a finished job: every artifact it produced, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobResult {
    pub artifacts: Vec<ArtifactLocator>,
}

/// State of a remote job as observed by one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Done(JobResult),
    Failed(String),
}

/// Raw bytes of a downloaded artifact.
#[derive(Debug, Clone)]
pub struct FetchedArtifact {
    pub bytes: Vec<u8>,
    /// `Content-Type` of the download response.
    pub media_type: Option<String>,
    /// `Content-Length` of the download response.
    pub content_length: Option<u64>,
}

/// Errors from the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service rejected the credential.
    #[error("Generation API rejected the credential ({status})")]
    Unauthorized { status: u16 },

    /// The service returned a non-2xx status code.
    #[error("Generation API error ({status}): {body}")]
    Status {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A response body did not have the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl TransportError {
    /// HTTP status associated with the failure, when there is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransportError::Request(e) => e.status().map(|s| s.as_u16()),
            TransportError::Unauthorized { status } | TransportError::Status { status, .. } => {
                Some(*status)
            }
            TransportError::Decode(_) => None,
        }
    }
}

/// One remote call per method; implementations must not retry.
#[async_trait]
pub trait RemoteJobClient: Send + Sync {
    /// Start a generation job for `prompt`.
    async fn submit(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<JobHandle, TransportError>;

    /// Observe the current state of a job.
    async fn poll(&self, handle: &JobHandle) -> Result<JobStatus, TransportError>;

    /// Download one produced artifact in full.
    async fn fetch(&self, locator: &ArtifactLocator) -> Result<FetchedArtifact, TransportError>;
}
