use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use veo_gallery_api::config::ServerConfig;
use veo_gallery_api::router::build_app_router;
use veo_gallery_api::state::AppState;
use veo_gallery_core::gallery::GalleryStore;
use veo_gallery_genai::api::VeoApi;
use veo_gallery_pipeline::JobOrchestrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "veo_gallery_api=debug,veo_gallery_pipeline=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        model = %config.veo.model,
        poll_interval_secs = config.poll.interval.as_secs(),
        "Loaded server configuration",
    );

    // --- Database ---
    let pool = veo_gallery_db::create_pool(&config.database_url)
        .await
        .expect("Failed to open preference database");
    tracing::info!("Database connection pool created");

    veo_gallery_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let sort_order = veo_gallery_db::repositories::PreferenceRepo::load_sort_key(&pool)
        .await
        .expect("Failed to load sort order preference");
    tracing::info!(%sort_order, "Loaded sort order preference");

    // --- Generation pipeline ---
    let client = Arc::new(VeoApi::new(config.veo.clone()));
    let gallery = Arc::new(RwLock::new(GalleryStore::new()));
    let orchestrator = Arc::new(JobOrchestrator::new(client, gallery, config.poll.clone()));
    tracing::info!("Job orchestrator created");

    // --- App state ---
    let state = AppState {
        pool,
        orchestrator: Arc::clone(&orchestrator),
        sort_order: Arc::new(RwLock::new(sort_order)),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped accepting connections, cleaning up");

    // Abort any in-flight generation run.
    orchestrator.shutdown();

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
