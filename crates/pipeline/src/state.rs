//! Observable orchestrator state.

use serde::Serialize;
use veo_gallery_core::record::GenerationContext;

use crate::error::USER_FACING_MESSAGES;

/// Progress of the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum RunPhase {
    Submitting,
    /// `attempts` counts polls issued so far, including the one in flight.
    Polling { attempts: u32 },
    Fetching,
}

/// What the orchestrator is doing right now.
///
/// Serialized with a `status` tag (`idle`, `running`, `failed`) for the
/// presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OrchestratorState {
    #[default]
    Idle,
    Running {
        context: GenerationContext,
        origin_title: Option<String>,
        phase: RunPhase,
    },
    /// The last run failed; `messages` are shown until dismissed.
    Failed { messages: Vec<String> },
}

impl OrchestratorState {
    pub fn is_running(&self) -> bool {
        matches!(self, OrchestratorState::Running { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, OrchestratorState::Failed { .. })
    }

    /// The failed state carrying the fixed user-facing messages.
    pub fn failed() -> Self {
        OrchestratorState::Failed {
            messages: USER_FACING_MESSAGES.iter().map(|m| m.to_string()).collect(),
        }
    }
}
