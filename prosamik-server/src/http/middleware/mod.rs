//! Middleware pipelines
//!
//! A [`Pipeline`] is an ordered list of [`Stage`]s, outermost first.
//! Route groups are wrapped by exactly one pipeline:
//!
//! - public:        CORS -> Logging -> handler
//! - protected API: CORS -> Logging -> Auth (401) -> handler
//! - dashboard:     CORS -> Logging -> Auth (redirect) -> handler
//!
//! Any stage may answer the request itself; the rest of the chain is then
//! skipped.

pub mod auth;
pub mod cors;
pub mod logging;

use std::sync::Arc;

use axum::middleware;
use axum::Router;

pub use auth::{AuthFailure, AuthGuard, Authenticator, TokenAuthenticator, SESSION_COOKIE};

/// One cross-cutting wrapper around a handler.
#[derive(Debug, Clone)]
pub enum Stage {
    Cors,
    Logging,
    Auth(AuthGuard),
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cors => "cors",
            Self::Logging => "logging",
            Self::Auth(_) => "auth",
        }
    }

    fn apply<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        match self {
            Self::Cors => router.layer(middleware::from_fn(cors::cors)),
            Self::Logging => router.layer(logging::layer()),
            Self::Auth(guard) => {
                router.layer(middleware::from_fn_with_state(guard.clone(), auth::require_auth))
            }
        }
    }
}

/// Ordered middleware stack, outermost stage first.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage inside the ones already present.
    pub fn then(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// CORS -> Logging
    pub fn public() -> Self {
        Self::new().then(Stage::Cors).then(Stage::Logging)
    }

    /// CORS -> Logging -> Auth, answering 401 on failure
    pub fn protected_api(authenticator: Arc<dyn Authenticator>) -> Self {
        Self::public().then(Stage::Auth(AuthGuard::new(
            authenticator,
            AuthFailure::Unauthorized,
        )))
    }

    /// CORS -> Logging -> Auth, redirecting to `login_path` on failure
    pub fn dashboard(authenticator: Arc<dyn Authenticator>, login_path: impl Into<String>) -> Self {
        Self::public().then(Stage::Auth(AuthGuard::new(
            authenticator,
            AuthFailure::Redirect(login_path.into()),
        )))
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.stages.iter().map(Stage::name).collect()
    }

    /// Wrap every route (and the fallback) of `router`.
    ///
    /// axum's last-applied layer runs first, so stages are applied
    /// innermost to outermost.
    pub fn wrap<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.stages
            .iter()
            .rev()
            .fold(router, |router, stage| stage.apply(router))
    }
}
