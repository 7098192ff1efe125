//! Events published by the orchestrator on its broadcast channel.

use serde::Serialize;
use veo_gallery_core::types::RecordId;
use veo_gallery_genai::client::JobHandle;

/// Capacity of the orchestrator's event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrchestratorEvent {
    JobSubmitted {
        handle: JobHandle,
    },
    JobPolled {
        handle: JobHandle,
        attempt: u32,
        pending: bool,
    },
    RecordCreated {
        record_id: RecordId,
    },
    /// Technical detail of a failed run. Not meant for end users.
    RunFailed {
        error: String,
    },
    RunCancelled,
}
