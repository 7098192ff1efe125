//! Generation job orchestration.
//!
//! [`orchestrator::JobOrchestrator`] drives one remote generation job at a
//! time from submission through polling and download, then stores the
//! result as a gallery record. Progress is observable through a
//! [`tokio::sync::watch`] state channel and a broadcast event stream.

pub mod error;
pub mod events;
pub mod orchestrator;
pub mod poll;
pub mod state;

pub use error::GenerationError;
pub use events::OrchestratorEvent;
pub use orchestrator::{GenerationRequest, JobOrchestrator};
pub use poll::PollPolicy;
pub use state::{OrchestratorState, RunPhase};
