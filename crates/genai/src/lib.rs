//! Client for the remote long-running video generation service.
//!
//! Provides the transport-neutral [`client::RemoteJobClient`] seam used by
//! the orchestrator, typed wire messages for the generation API, and the
//! [`api::VeoApi`] HTTP implementation built on [`reqwest`].

pub mod api;
pub mod client;
pub mod messages;
