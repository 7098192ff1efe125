//! Poll cadence and give-up bounds for a pending remote job.

use std::time::Duration;

/// Default wait between two polls of the same job.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
/// Default wall-clock ceiling for one job.
pub const DEFAULT_MAX_ELAPSED: Duration = Duration::from_secs(30 * 60);

/// How often to poll and when to stop waiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Fixed delay between polls.
    pub interval: Duration,
    /// Give up after this many polls that all reported pending.
    pub max_attempts: Option<u32>,
    /// Give up once this much time has passed since the first poll.
    pub max_elapsed: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
            max_elapsed: Some(DEFAULT_MAX_ELAPSED),
        }
    }
}

impl PollPolicy {
    /// Poll forever at `interval`.
    pub fn unbounded(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
            max_elapsed: None,
        }
    }

    /// Whether a job still pending after `attempts` polls and `elapsed`
    /// time should be abandoned.
    pub fn is_exhausted(&self, attempts: u32, elapsed: Duration) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
            || self.max_elapsed.is_some_and(|max| elapsed >= max)
    }
}
