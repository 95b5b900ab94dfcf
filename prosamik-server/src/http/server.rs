//! Axum server setup
//!
//! Server skeleton with:
//! - Route groups wrapped by their middleware pipelines
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use sqlx::AnyPool;
use tokio::net::TcpListener;

use super::middleware::{Authenticator, TokenAuthenticator};
use super::routes;

/// Default login entry point for browser redirects.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8080)
    pub bind_addr: SocketAddr,

    /// Tokens accepted by protected routes (bearer header or session cookie).
    ///
    /// Empty means every protected route rejects.
    pub api_tokens: Vec<String>,

    /// Where unauthenticated dashboard requests are redirected
    pub login_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            api_tokens: Vec::new(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: AnyPool,
}

/// Build the application router with all routes and pipelines.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let authenticator = TokenAuthenticator::new(config.api_tokens.iter().cloned());
    if authenticator.is_empty() {
        tracing::warn!("No API tokens configured - protected routes will reject every request");
    }
    let authenticator: Arc<dyn Authenticator> = Arc::new(authenticator);

    routes::router(authenticator, &config.login_path).with_state(Arc::new(state))
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&database_url).await?;
/// let config = ServerConfig::default();
/// run_server(pool, config).await?;
/// ```
pub async fn run_server(pool: AnyPool, config: ServerConfig) -> Result<(), ServerError> {
    let app = build_router(AppState { pool }, &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

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
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
}
