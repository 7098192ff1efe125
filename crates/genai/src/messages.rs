//! Wire types for the long-running video generation API.
//!
//! Submission returns an operation `{"name": ...}`. Polling that name
//! returns the same operation with `done`, `error` and `response` filled in
//! as the job progresses. [`Operation::into_status`] maps it onto the
//! transport-neutral [`JobStatus`].

use serde::{Deserialize, Serialize};

use crate::client::{ArtifactLocator, GenerationOptions, JobResult, JobStatus};

/// Body of `POST /models/{model}:predictLongRunning`.
#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub instances: Vec<PredictInstance<'a>>,
    pub parameters: PredictParameters<'a>,
}

#[derive(Debug, Serialize)]
pub struct PredictInstance<'a> {
    pub prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictParameters<'a> {
    pub aspect_ratio: &'a str,
    pub sample_count: u32,
}

impl<'a> PredictRequest<'a> {
    pub fn new(prompt: &'a str, options: &'a GenerationOptions) -> Self {
        Self {
            instances: vec![PredictInstance { prompt }],
            parameters: PredictParameters {
                aspect_ratio: &options.aspect_ratio,
                sample_count: options.sample_count,
            },
        }
    }
}

/// A long-running operation as returned by submit and poll.
#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    pub name: String,
    /// Absent until the operation finishes.
    #[serde(default)]
    pub done: bool,
    pub error: Option<OperationError>,
    pub response: Option<OperationResponse>,
}

/// Terminal failure attached to a finished operation.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    pub generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    #[serde(default)]
    pub generated_samples: Vec<GeneratedSample>,
    /// Reasons given when safety filters dropped some or all samples.
    #[serde(default)]
    pub rai_media_filtered_reasons: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedSample {
    pub video: Option<VideoRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRef {
    pub uri: Option<String>,
    pub mime_type: Option<String>,
}

impl Operation {
    /// Interpret the operation as a [`JobStatus`].
    ///
    /// A finished operation without a response, or whose samples carry no
    /// URI, yields `Done` with fewer (possibly zero) artifacts. The caller
    /// decides whether an empty result is an error.
    pub fn into_status(self) -> JobStatus {
        if !self.done {
            return JobStatus::Pending;
        }

        if let Some(error) = self.error {
            let reason = if error.message.is_empty() {
                format!("operation failed with code {}", error.code)
            } else {
                error.message
            };
            return JobStatus::Failed(reason);
        }

        let video_response = self
            .response
            .and_then(|r| r.generate_video_response)
            .unwrap_or_default();

        if !video_response.rai_media_filtered_reasons.is_empty() {
            tracing::warn!(
                operation = %self.name,
                reasons = ?video_response.rai_media_filtered_reasons,
                "Generated samples were filtered",
            );
        }

        let artifacts = video_response
            .generated_samples
            .into_iter()
            .filter_map(|sample| sample.video)
            .filter_map(|video| {
                video.uri.map(|uri| ArtifactLocator {
                    uri,
                    media_type: video.mime_type,
                })
            })
            .collect();

        JobStatus::Done(JobResult { artifacts })
    }
}
