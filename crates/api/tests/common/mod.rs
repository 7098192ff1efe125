#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use tokio::sync::RwLock;
use tower::ServiceExt;
use veo_gallery_api::config::ServerConfig;
use veo_gallery_api::router::build_app_router;
use veo_gallery_api::state::AppState;
use veo_gallery_core::codec;
use veo_gallery_core::gallery::GalleryStore;
use veo_gallery_core::record::Record;
use veo_gallery_db::repositories::PreferenceRepo;
use veo_gallery_genai::api::VeoConfig;
use veo_gallery_genai::client::{
    ArtifactLocator, FetchedArtifact, GenerationOptions, JobHandle, JobResult, JobStatus,
    RemoteJobClient, TransportError,
};
use veo_gallery_pipeline::{JobOrchestrator, PollPolicy};

/// Bytes every fake download returns.
pub const FAKE_VIDEO: &[u8] = b"\x00\x00\x00\x18ftypmp42fake";

/// How the fake generation service answers polls.
#[derive(Debug, Clone, Copy)]
pub enum Script {
    /// Finish on the first poll with one artifact.
    Succeed,
    /// Finish on the first poll with no artifacts.
    Empty,
    /// Stay pending forever.
    Hang,
}

/// In-process stand-in for the remote generation service.
pub struct FakeClient {
    script: Script,
    submitted: Mutex<Vec<String>>,
}

impl FakeClient {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteJobClient for FakeClient {
    async fn submit(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<JobHandle, TransportError> {
        self.submitted.lock().unwrap().push(prompt.to_string());
        Ok(JobHandle::new("operations/fake"))
    }

    async fn poll(&self, _handle: &JobHandle) -> Result<JobStatus, TransportError> {
        Ok(match self.script {
            Script::Succeed => JobStatus::Done(JobResult {
                artifacts: vec![ArtifactLocator {
                    uri: "https://files.example/video.mp4".into(),
                    media_type: Some("video/mp4".into()),
                }],
            }),
            Script::Empty => JobStatus::Done(JobResult::default()),
            Script::Hang => JobStatus::Pending,
        })
    }

    async fn fetch(&self, _locator: &ArtifactLocator) -> Result<FetchedArtifact, TransportError> {
        Ok(FetchedArtifact {
            bytes: FAKE_VIDEO.to_vec(),
            media_type: Some("video/mp4".into()),
            content_length: Some(FAKE_VIDEO.len() as u64),
        })
    }
}

/// Build a test `ServerConfig` with safe defaults and a fast poll interval.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: "sqlite::memory:".to_string(),
        veo: VeoConfig::new("test-key"),
        poll: PollPolicy::unbounded(Duration::from_millis(10)),
    }
}

/// The router plus handles into its state for assertions.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub client: Arc<FakeClient>,
}

/// Build the full application router, with all middleware layers, over an
/// in-memory database and a fake generation service.
pub async fn build_test_app(script: Script) -> TestApp {
    let config = test_config();

    let pool = veo_gallery_db::create_memory_pool().await.unwrap();
    veo_gallery_db::run_migrations(&pool).await.unwrap();

    let client = Arc::new(FakeClient::new(script));
    let orchestrator = Arc::new(JobOrchestrator::new(
        Arc::clone(&client) as Arc<dyn RemoteJobClient>,
        Arc::new(RwLock::new(GalleryStore::new())),
        config.poll.clone(),
    ));

    let sort_order = PreferenceRepo::load_sort_key(&pool).await.unwrap();

    let state = AppState {
        pool,
        orchestrator,
        sort_order: Arc::new(RwLock::new(sort_order)),
    };

    TestApp {
        router: build_app_router(state.clone(), &config),
        state,
        client,
    }
}

/// Insert a finished record with the given title directly into the gallery.
pub async fn seed_record(app: &TestApp, title: &str, created_millis: i64) -> Arc<Record> {
    let record = Record::new(
        title,
        format!("prompt for {title}"),
        codec::encode(FAKE_VIDEO, "video/mp4"),
        Utc.timestamp_millis_opt(created_millis).unwrap(),
    );
    app.state.orchestrator.gallery().write().await.prepend(record)
}

/// Wait until the orchestrator leaves the running state.
pub async fn wait_until_settled(app: &TestApp) {
    let mut states = app.state.orchestrator.subscribe_state();
    tokio::time::timeout(Duration::from_secs(5), states.wait_for(|s| !s.is_running()))
        .await
        .expect("generation run did not settle")
        .unwrap();
}

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: &TestApp, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: &TestApp, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &TestApp, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
