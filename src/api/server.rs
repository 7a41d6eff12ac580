//! Stores API Server implementation
//!
//! HTTP REST API server using Axum.
//! Provides endpoints for store records, locations, export, import.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::service::StoresService;
use crate::store::YamlStore;

/// Largest accepted import upload
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// API Server configuration
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("stores-data"),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub version: String,
    pub service: Arc<StoresService>,
}

impl AppState {
    pub fn new(service: StoresService) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            service: Arc::new(service),
        }
    }
}

/// Build the router (without binding a socket)
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Stores
        .route(
            "/api/v1/stores",
            get(handlers::list_stores).post(handlers::create_store),
        )
        .route(
            "/api/v1/stores/:id",
            put(handlers::update_store).delete(handlers::delete_store),
        )
        .route(
            "/api/v1/locations",
            get(handlers::list_locations).post(handlers::add_location),
        )
        .route("/api/v1/statuses", get(handlers::list_statuses))
        // Spreadsheets
        .route("/api/v1/export", get(handlers::export_excel))
        .route(
            "/api/v1/import",
            axum::routing::post(handlers::import_excel)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        // State and middleware
        .with_state(Arc::new(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stores_server=info,stores_admin=info,tower_http=info".into()),
        )
        .init();

    let store = YamlStore::open(&config.data_dir)?;
    info!("Data directory: {}", store.dir().display());
    let app = build_router(AppState::new(StoresService::new(Arc::new(store))));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("🏪 Stores API Server starting on http://{}", addr);
    info!("   Endpoints: /api/v1/stores, /api/v1/locations, /api/v1/statuses, /api/v1/export, /api/v1/import");
    info!("   Health: /health, Version: /version");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Stores API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
