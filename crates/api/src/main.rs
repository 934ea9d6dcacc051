use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use polyglot_core::artifacts::{ArtifactStore, LocalArtifactStore};
use polyglot_core::history::{HistoryStore, InMemoryHistoryStore};
use polyglot_translator::HttpTranslator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use polyglot_api::config::ServerConfig;
use polyglot_api::router::build_app_router;
use polyglot_api::state::AppState;
use polyglot_api::ws;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Artifact storage ---
    let local_store = LocalArtifactStore::new(&config.upload_dir);
    local_store
        .ensure_root()
        .await
        .expect("Failed to create upload directory");
    tracing::info!(upload_dir = %config.upload_dir.display(), "Artifact store ready");
    let artifacts: Arc<dyn ArtifactStore> = Arc::new(local_store);

    // --- History store ---
    let (history, pool): (Arc<dyn HistoryStore>, _) = match &config.database_url {
        Some(database_url) => {
            let pool = polyglot_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            polyglot_db::health_check(&pool)
                .await
                .expect("Database health check failed");

            polyglot_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            (
                Arc::new(polyglot_db::PgHistoryStore::new(pool.clone())),
                Some(pool),
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set, history is kept in memory only");
            (Arc::new(InMemoryHistoryStore::new()), None)
        }
    };

    // --- Translation client ---
    let translator =
        HttpTranslator::new(config.translator.clone()).expect("Failed to build HTTP client");
    tracing::info!(api_url = %translator.api_url(), "Translation client ready");

    // --- App state ---
    let state = AppState::new(
        config.clone(),
        artifacts,
        Arc::new(translator),
        history,
        pool,
    );
    let ws_manager = Arc::clone(&state.ws_manager);

    // --- Heartbeat ---
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&ws_manager));

    // --- Router ---
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

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    let ws_count = ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    ws_manager.shutdown_all().await;

    heartbeat_handle.abort();
    let _ = tokio::time::timeout(
        Duration::from_secs(config.shutdown_timeout_secs),
        heartbeat_handle,
    )
    .await;
    tracing::info!("Heartbeat task stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Install the global tracing subscriber.
///
/// Filter comes from `RUST_LOG` (default `polyglot_api=debug,tower_http=debug`);
/// `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "polyglot_api=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
