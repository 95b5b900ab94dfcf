//! Authentication stage
//!
//! Credential issuance lives elsewhere; this stage only asks an
//! [`Authenticator`] whether the request carries a valid credential.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, LOCATION};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::http::error::ApiError;

/// Cookie carrying a browser session token.
pub const SESSION_COOKIE: &str = "session";

/// "Is this request authenticated?"
pub trait Authenticator: Send + Sync + 'static {
    fn is_authenticated(&self, headers: &HeaderMap) -> bool;
}

/// Accepts a fixed set of tokens, presented either as
/// `Authorization: Bearer <token>` or as a `session=<token>` cookie.
#[derive(Default)]
pub struct TokenAuthenticator {
    tokens: HashSet<String>,
}

impl TokenAuthenticator {
    pub fn new<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Authenticator for TokenAuthenticator {
    fn is_authenticated(&self, headers: &HeaderMap) -> bool {
        if bearer_token(headers).is_some_and(|token| self.tokens.contains(token)) {
            return true;
        }

        CookieJar::from_headers(headers)
            .get(SESSION_COOKIE)
            .is_some_and(|cookie| self.tokens.contains(cookie.value()))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
}

/// What an unauthenticated request gets back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// 401 with a JSON error body (API routes)
    Unauthorized,
    /// 302 to the login entry point (browser routes)
    Redirect(String),
}

/// Authenticator plus failure policy; the state of the auth stage.
#[derive(Clone)]
pub struct AuthGuard {
    authenticator: Arc<dyn Authenticator>,
    on_failure: AuthFailure,
}

impl AuthGuard {
    pub fn new(authenticator: Arc<dyn Authenticator>, on_failure: AuthFailure) -> Self {
        Self {
            authenticator,
            on_failure,
        }
    }

    pub fn on_failure(&self) -> &AuthFailure {
        &self.on_failure
    }
}

impl fmt::Debug for AuthGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGuard")
            .field("on_failure", &self.on_failure)
            .finish_non_exhaustive()
    }
}

/// Forward authenticated requests unchanged; answer everything else here.
pub async fn require_auth(
    State(guard): State<AuthGuard>,
    request: Request,
    next: Next,
) -> Response {
    if guard.authenticator.is_authenticated(request.headers()) {
        return next.run(request).await;
    }

    tracing::warn!(
        path = %request.uri().path(),
        "Unauthorized request - missing or invalid credentials"
    );

    match guard.on_failure {
        AuthFailure::Unauthorized => ApiError::Unauthorized.into_response(),
        AuthFailure::Redirect(location) => {
            (StatusCode::FOUND, [(LOCATION, location)]).into_response()
        }
    }
}
