//! REST API client for the video generation service.
//!
//! Wraps job submission, operation polling and artifact download using
//! [`reqwest`], and implements [`RemoteJobClient`] on top of them.

use std::fmt;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};

use crate::client::{
    ArtifactLocator, FetchedArtifact, GenerationOptions, JobHandle, JobStatus, RemoteJobClient,
    TransportError,
};
use crate::messages::{Operation, PredictRequest};

/// Default base URL of the generation API.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default video model.
pub const DEFAULT_MODEL: &str = "veo-2.0-generate-001";

/// Header carrying the credential on API calls.
const API_KEY_HEADER: &str = "x-goog-api-key";
/// Query parameter carrying the credential on artifact downloads.
const API_KEY_QUERY: &str = "key";

/// Connection settings for one generation service endpoint.
#[derive(Clone)]
pub struct VeoConfig {
    /// Base HTTP URL, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub api_url: String,
    /// Pre-provisioned API credential.
    pub api_key: String,
    /// Model used for every submission.
    pub model: String,
}

impl VeoConfig {
    /// Config for the public endpoint and default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl fmt::Debug for VeoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VeoConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

/// HTTP client for the generation service.
pub struct VeoApi {
    client: reqwest::Client,
    config: VeoConfig,
}

impl VeoApi {
    pub fn new(config: VeoConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Submit a prompt for generation.
    ///
    /// Sends `POST /models/{model}:predictLongRunning` and returns the
    /// operation describing the new job.
    pub async fn submit_generation(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Operation, TransportError> {
        let url = format!(
            "{}/models/{}:predictLongRunning",
            self.base_url(),
            self.config.model
        );

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&PredictRequest::new(prompt, options))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Retrieve the current state of an operation by name.
    pub async fn get_operation(&self, name: &str) -> Result<Operation, TransportError> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url(), name.trim_start_matches('/')))
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Download a produced artifact, appending the credential to its URI.
    pub async fn download(&self, uri: &str) -> Result<FetchedArtifact, TransportError> {
        let url = self.download_url(uri)?;

        let response = Self::ensure_success(self.client.get(url).send().await?).await?;

        let content_length = response.content_length();
        let media_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string());
        let bytes = response.bytes().await?.to_vec();

        Ok(FetchedArtifact {
            bytes,
            media_type,
            content_length,
        })
    }

    /// Build the download URL for an artifact URI with the credential
    /// appended as the `key` query parameter.
    pub fn download_url(&self, uri: &str) -> Result<Url, TransportError> {
        let mut url = Url::parse(uri)
            .map_err(|e| TransportError::Decode(format!("invalid artifact URI '{uri}': {e}")))?;
        url.query_pairs_mut()
            .append_pair(API_KEY_QUERY, &self.config.api_key);
        Ok(url)
    }

    // ---- private helpers ----

    fn base_url(&self) -> &str {
        self.config.api_url.trim_end_matches('/')
    }

    /// Ensure the response has a success status code. Credential rejections
    /// map to [`TransportError::Unauthorized`], everything else to
    /// [`TransportError::Status`] with the body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TransportError::Unauthorized {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TransportError> {
        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RemoteJobClient for VeoApi {
    async fn submit(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<JobHandle, TransportError> {
        let operation = self.submit_generation(prompt, options).await?;
        tracing::info!(
            operation = %operation.name,
            model = %self.config.model,
            "Generation job submitted",
        );
        Ok(JobHandle::new(operation.name))
    }

    async fn poll(&self, handle: &JobHandle) -> Result<JobStatus, TransportError> {
        let operation = self.get_operation(handle.as_str()).await?;
        Ok(operation.into_status())
    }

    async fn fetch(&self, locator: &ArtifactLocator) -> Result<FetchedArtifact, TransportError> {
        self.download(&locator.uri).await
    }
}
