//! Axum server setup
//!
//! Server skeleton with:
//! - CORS locked to the frontend origin (credentials enabled)
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::Router;
use serde::Serialize;
use sqlx::mysql::MySqlPool;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::db::{LegacyRepository, MemoryRepository, MySqlRepository, SchedulerRepository};

/// Default listening port
pub const DEFAULT_PORT: u16 = 1338;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:1338)
    pub bind_addr: SocketAddr,

    /// The only cross-origin caller allowed, e.g. `http://localhost:5173`
    pub frontend_url: Option<String>,

    /// Mirror any origin (default: false)
    ///
    /// WARNING: combined with credentials this lets any site call the API.
    /// Only use for development.
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            frontend_url: None,
            cors_permissive: false,
        }
    }
}

/// Where the repositories keep their rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Storage {
    Mysql,
    Memory,
}

/// Shared application state: one repository per table family
#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub legacy: Arc<dyn LegacyRepository>,
    pub scheduler: Arc<dyn SchedulerRepository>,
}

impl AppState {
    pub fn new(
        storage: Storage,
        legacy: Arc<dyn LegacyRepository>,
        scheduler: Arc<dyn SchedulerRepository>,
    ) -> Self {
        Self {
            storage,
            legacy,
            scheduler,
        }
    }

    /// Both families backed by the same MySQL pool.
    pub fn mysql(pool: MySqlPool) -> Self {
        let repo = Arc::new(MySqlRepository::new(pool));
        Self::new(Storage::Mysql, repo.clone(), repo)
    }

    /// Both families backed by one in-memory store.
    pub fn in_memory(repo: MemoryRepository) -> Self {
        let repo = Arc::new(repo);
        Self::new(Storage::Memory, repo.clone(), repo)
    }
}

/// Build the CORS layer for `config`.
pub fn cors_layer(config: &ServerConfig) -> Result<CorsLayer, ServerError> {
    if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return Ok(CorsLayer::very_permissive());
    }

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    match config.frontend_url.as_deref() {
        Some(url) => {
            // Browsers send the origin without a trailing slash
            let origin = url.trim().trim_end_matches('/');
            let origin = HeaderValue::from_str(origin)
                .map_err(|_| ServerError::InvalidOrigin(url.to_owned()))?;
            tracing::info!(origin = %url, "CORS: frontend origin allowed");
            Ok(layer.allow_origin(origin))
        }
        None => {
            tracing::warn!("CORS: no frontend URL configured - cross-origin requests will be refused");
            Ok(layer)
        }
    }
}

/// Build the application router with all routes.
pub fn build_router(state: AppState, config: &ServerConfig) -> Result<Router, ServerError> {
    let cors = cors_layer(config)?;

    Ok(Router::new()
        .merge(routes::health::router())
        .merge(routes::legacy::router())
        .merge(routes::scheduler::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Run the HTTP server until Ctrl+C or SIGTERM.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&database_url).await?;
/// run_server(AppState::mysql(pool), ServerConfig::default()).await?;
/// ```
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServerError> {
    let app = build_router(state, &config)?;

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Started on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
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
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid frontend URL for CORS: {0}")]
    InvalidOrigin(String),
}
