use std::sync::Arc;

use tokio::sync::RwLock;
use veo_gallery_core::sort::SortKey;
use veo_gallery_pipeline::JobOrchestrator;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind an `Arc` or is a pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Preference database pool.
    pub pool: veo_gallery_db::DbPool,
    /// The single generation job slot; also owns the gallery.
    pub orchestrator: Arc<JobOrchestrator>,
    /// Gallery sort order, loaded from the database at startup and written
    /// through on every change.
    pub sort_order: Arc<RwLock<SortKey>>,
}
