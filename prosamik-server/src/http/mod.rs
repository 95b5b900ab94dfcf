//! HTTP server layer
//!
//! Axum server with:
//! - Per-route middleware pipelines (CORS, logging, auth)
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use middleware::{Authenticator, Pipeline, Stage, TokenAuthenticator};
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
