//! The generation job orchestrator.
//!
//! A [`JobOrchestrator`] owns a single job slot. Each run submits a prompt,
//! polls the remote job at a fixed interval until it finishes, downloads the
//! first produced artifact and prepends the resulting [`Record`] to the
//! shared [`GalleryStore`]. Every suspension point races against the run's
//! [`CancellationToken`], which is a child of the orchestrator's master
//! token so [`JobOrchestrator::shutdown`] stops everything at once.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{broadcast, watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use veo_gallery_core::codec::{self, DEFAULT_MEDIA_TYPE};
use veo_gallery_core::gallery::GalleryStore;
use veo_gallery_core::record::{normalize_prompt, GenerationContext, Record};
use veo_gallery_genai::client::{
    GenerationOptions, JobHandle, JobResult, JobStatus, RemoteJobClient,
};

use crate::error::GenerationError;
use crate::events::{OrchestratorEvent, EVENT_CHANNEL_CAPACITY};
use crate::poll::PollPolicy;
use crate::state::{OrchestratorState, RunPhase};

/// What to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub context: GenerationContext,
    /// Title of the record being remixed, if any.
    pub origin_title: Option<String>,
}

impl GenerationRequest {
    /// A generation from a fresh prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            context: GenerationContext::New,
            origin_title: None,
        }
    }

    /// A generation from the edited description of an existing record.
    pub fn remix(description: impl Into<String>, origin_title: impl Into<String>) -> Self {
        Self {
            prompt: description.into(),
            context: GenerationContext::Remix,
            origin_title: Some(origin_title.into()),
        }
    }
}

/// A run that holds the job slot.
struct ClaimedRun {
    prompt: String,
    context: GenerationContext,
    origin_title: Option<String>,
    cancel: CancellationToken,
}

/// Drives generation jobs one at a time and publishes their progress.
pub struct JobOrchestrator {
    client: Arc<dyn RemoteJobClient>,
    gallery: Arc<RwLock<GalleryStore>>,
    policy: PollPolicy,
    options: GenerationOptions,
    state_tx: watch::Sender<OrchestratorState>,
    event_tx: broadcast::Sender<OrchestratorEvent>,
    /// Master token; every run's token is a child of it.
    cancel: CancellationToken,
    /// Token of the run currently holding the slot.
    current: Mutex<Option<CancellationToken>>,
}

impl JobOrchestrator {
    pub fn new(
        client: Arc<dyn RemoteJobClient>,
        gallery: Arc<RwLock<GalleryStore>>,
        policy: PollPolicy,
    ) -> Self {
        let (state_tx, _) = watch::channel(OrchestratorState::Idle);
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            client,
            gallery,
            policy,
            options: GenerationOptions::default(),
            state_tx,
            event_tx,
            cancel: CancellationToken::new(),
            current: Mutex::new(None),
        }
    }

    pub fn gallery(&self) -> &Arc<RwLock<GalleryStore>> {
        &self.gallery
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> OrchestratorState {
        self.state_tx.borrow().clone()
    }

    /// Observe state transitions.
    pub fn subscribe_state(&self) -> watch::Receiver<OrchestratorState> {
        self.state_tx.subscribe()
    }

    /// Subscribe to orchestrator events.
    pub fn subscribe(&self) -> broadcast::Receiver<OrchestratorEvent> {
        self.event_tx.subscribe()
    }

    /// Run a generation to completion on the current task.
    ///
    /// Fails fast with [`GenerationError::Busy`] when another run holds the
    /// slot, and with [`GenerationError::EmptyPrompt`] for a blank prompt.
    /// Neither changes the state.
    pub async fn run(&self, request: GenerationRequest) -> Result<Arc<Record>, GenerationError> {
        let run = self.claim(request)?;
        self.drive(run).await
    }

    /// Claim the slot now and drive the run on a spawned task.
    ///
    /// Busy and empty-prompt rejections are returned synchronously, so a
    /// caller that gets `Ok` knows the run has started.
    pub fn start(
        self: &Arc<Self>,
        request: GenerationRequest,
    ) -> Result<JoinHandle<Result<Arc<Record>, GenerationError>>, GenerationError> {
        let run = self.claim(request)?;
        let this = Arc::clone(self);
        Ok(tokio::spawn(async move { this.drive(run).await }))
    }

    /// Signal the running job to stop. Returns `false` when nothing is
    /// running.
    pub fn cancel_current(&self) -> bool {
        match self.current_slot().as_ref() {
            Some(token) => {
                tracing::info!("Cancelling current generation run");
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Clear a failed state back to idle. No-op in any other state.
    pub fn dismiss_error(&self) -> bool {
        self.state_tx.send_if_modified(|state| {
            if state.is_failed() {
                *state = OrchestratorState::Idle;
                true
            } else {
                false
            }
        })
    }

    /// Cancel every in-flight run.
    pub fn shutdown(&self) {
        tracing::info!("Shutting down job orchestrator");
        self.cancel.cancel();
    }

    // ---- run lifecycle ----

    /// Validate the request and atomically move into `Running`.
    fn claim(&self, request: GenerationRequest) -> Result<ClaimedRun, GenerationError> {
        let prompt = normalize_prompt(&request.prompt)
            .map_err(|_| GenerationError::EmptyPrompt)?
            .to_string();

        let running = OrchestratorState::Running {
            context: request.context,
            origin_title: request.origin_title.clone(),
            phase: RunPhase::Submitting,
        };
        let cancel = self.cancel.child_token();
        // The slot and the state change under the same lock.
        let claimed = self.state_tx.send_if_modified(|state| {
            if state.is_running() {
                false
            } else {
                *self.current_slot() = Some(cancel.clone());
                *state = running;
                true
            }
        });
        if !claimed {
            tracing::warn!("Rejected generation request: a job is already running");
            return Err(GenerationError::Busy);
        }

        tracing::info!(
            context = ?request.context,
            prompt_chars = prompt.chars().count(),
            "Generation run started",
        );

        Ok(ClaimedRun {
            prompt,
            context: request.context,
            origin_title: request.origin_title,
            cancel,
        })
    }

    /// Execute a claimed run and settle the state from its outcome.
    async fn drive(&self, run: ClaimedRun) -> Result<Arc<Record>, GenerationError> {
        let result = self.execute(&run).await;

        match &result {
            Ok(record) => {
                self.settle(OrchestratorState::Idle);
                self.emit(OrchestratorEvent::RecordCreated {
                    record_id: record.id(),
                });
                tracing::info!(record_id = %record.id(), title = %record.title(), "Generation run completed");
            }
            Err(e) if e.is_run_failure() => {
                tracing::error!(error = %e, detail = ?e, "Generation run failed");
                self.settle(OrchestratorState::failed());
                self.emit(OrchestratorEvent::RunFailed {
                    error: e.to_string(),
                });
            }
            Err(_) => {
                self.settle(OrchestratorState::Idle);
                self.emit(OrchestratorEvent::RunCancelled);
                tracing::info!("Generation run cancelled");
            }
        }
        result
    }

    async fn execute(&self, run: &ClaimedRun) -> Result<Arc<Record>, GenerationError> {
        let handle = until_cancelled(&run.cancel, self.client.submit(&run.prompt, &self.options))
            .await?
            .map_err(GenerationError::SubmitFailed)?;
        tracing::info!(job = %handle, "Generation job submitted");
        self.emit(OrchestratorEvent::JobSubmitted {
            handle: handle.clone(),
        });

        let result = self.poll_until_done(run, &handle).await?;

        let discarded = result.artifacts.len().saturating_sub(1);
        let Some(locator) = result.artifacts.into_iter().next() else {
            return Err(GenerationError::EmptyResult);
        };
        if discarded > 0 {
            tracing::debug!(job = %handle, discarded, "Ignoring extra artifacts");
        }

        self.set_phase(RunPhase::Fetching);
        let fetched = until_cancelled(&run.cancel, self.client.fetch(&locator))
            .await?
            .map_err(|source| GenerationError::FetchFailed {
                status_code: source.status_code(),
                source,
            })?;
        tracing::debug!(
            job = %handle,
            bytes = fetched.bytes.len(),
            content_type = ?fetched.media_type,
            "Artifact downloaded",
        );

        let media_type = locator.media_type.as_deref().unwrap_or(DEFAULT_MEDIA_TYPE);
        let artifact =
            codec::encode_reader(fetched.bytes.as_slice(), media_type, fetched.content_length)?;

        let record = Record::create(
            &run.prompt,
            run.context,
            run.origin_title.as_deref(),
            artifact,
        );
        Ok(self.gallery.write().await.prepend(record))
    }

    /// Poll `handle` until it leaves the pending state.
    ///
    /// The first poll is issued immediately; later ones wait
    /// [`PollPolicy::interval`] after the previous answer.
    async fn poll_until_done(
        &self,
        run: &ClaimedRun,
        handle: &JobHandle,
    ) -> Result<JobResult, GenerationError> {
        let started = Instant::now();
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            self.set_phase(RunPhase::Polling { attempts });

            let status = until_cancelled(&run.cancel, self.client.poll(handle))
                .await?
                .map_err(GenerationError::PollFailed)?;

            let pending = status == JobStatus::Pending;
            tracing::debug!(job = %handle, attempt = attempts, pending, "Polled generation job");
            self.emit(OrchestratorEvent::JobPolled {
                handle: handle.clone(),
                attempt: attempts,
                pending,
            });

            match status {
                JobStatus::Pending => {
                    let elapsed = started.elapsed();
                    if self.policy.is_exhausted(attempts, elapsed) {
                        return Err(GenerationError::Timeout { attempts, elapsed });
                    }
                    until_cancelled(&run.cancel, tokio::time::sleep(self.policy.interval)).await?;
                }
                JobStatus::Done(result) => return Ok(result),
                JobStatus::Failed(reason) => return Err(GenerationError::JobFailed(reason)),
            }
        }
    }

    // ---- private helpers ----

    /// Release the job slot and publish `next` in one step.
    fn settle(&self, next: OrchestratorState) {
        self.state_tx.send_modify(|state| {
            *self.current_slot() = None;
            *state = next;
        });
    }

    fn set_phase(&self, phase: RunPhase) {
        self.state_tx.send_if_modified(|state| match state {
            OrchestratorState::Running { phase: current, .. } if *current != phase => {
                *current = phase;
                true
            }
            _ => false,
        });
    }

    fn emit(&self, event: OrchestratorEvent) {
        // No subscribers is fine.
        let _ = self.event_tx.send(event);
    }

    fn current_slot(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Await `fut` unless `cancel` fires first.
async fn until_cancelled<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output, GenerationError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(GenerationError::Cancelled),
        output = fut => Ok(output),
    }
}
