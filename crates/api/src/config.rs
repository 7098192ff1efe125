use std::time::Duration;

use veo_gallery_genai::api::{VeoConfig, DEFAULT_API_URL, DEFAULT_MODEL};
use veo_gallery_pipeline::poll::{PollPolicy, DEFAULT_MAX_ELAPSED, DEFAULT_POLL_INTERVAL};

/// Server configuration loaded from environment variables.
///
/// Everything except the API key has a default suitable for local use.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// SQLite URL of the preference database.
    pub database_url: String,
    /// Generation service endpoint and credential.
    pub veo: VeoConfig,
    /// Poll cadence and give-up bounds for generation jobs.
    pub poll: PollPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                                           |
    /// |-------------------------|---------------------------------------------------|
    /// | `HOST`                  | `0.0.0.0`                                         |
    /// | `PORT`                  | `3000`                                            |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`                           |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                                              |
    /// | `DATABASE_URL`          | `sqlite://veo-gallery.db?mode=rwc`                |
    /// | `API_KEY`               | required                                          |
    /// | `VEO_MODEL`             | `veo-2.0-generate-001`                            |
    /// | `VEO_API_URL`           | `https://generativelanguage.googleapis.com/v1beta`|
    /// | `POLL_INTERVAL_SECS`    | `10`                                              |
    /// | `POLL_MAX_ATTEMPTS`     | unset (no cap)                                    |
    /// | `POLL_MAX_ELAPSED_SECS` | `1800` (`0` disables)                             |
    ///
    /// Panics on malformed values or a missing `API_KEY`.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://veo-gallery.db?mode=rwc".into());

        let veo = VeoConfig {
            api_url: std::env::var("VEO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()),
            api_key: std::env::var("API_KEY").expect("API_KEY must be set"),
            model: std::env::var("VEO_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into()),
        };

        let interval_secs: u64 = std::env::var("POLL_INTERVAL_SECS")
            .map(|v| v.parse().expect("POLL_INTERVAL_SECS must be a valid u64"))
            .unwrap_or(DEFAULT_POLL_INTERVAL.as_secs());

        let max_attempts: Option<u32> = std::env::var("POLL_MAX_ATTEMPTS")
            .ok()
            .map(|v| v.parse().expect("POLL_MAX_ATTEMPTS must be a valid u32"));

        let max_elapsed_secs: u64 = std::env::var("POLL_MAX_ELAPSED_SECS")
            .map(|v| v.parse().expect("POLL_MAX_ELAPSED_SECS must be a valid u64"))
            .unwrap_or(DEFAULT_MAX_ELAPSED.as_secs());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            veo,
            poll: poll_policy(interval_secs, max_attempts, max_elapsed_secs),
        }
    }
}

/// Build a [`PollPolicy`] from raw settings. A zero elapsed ceiling means
/// no ceiling.
pub fn poll_policy(interval_secs: u64, max_attempts: Option<u32>, max_elapsed_secs: u64) -> PollPolicy {
    PollPolicy {
        interval: Duration::from_secs(interval_secs),
        max_attempts,
        max_elapsed: (max_elapsed_secs > 0).then(|| Duration::from_secs(max_elapsed_secs)),
    }
}
