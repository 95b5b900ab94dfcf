//! Route table
//!
//! Each route group is wrapped by exactly one middleware pipeline.

pub mod content;
pub mod dashboard;
pub mod health;

use std::sync::Arc;

use axum::Router;

use super::middleware::{Authenticator, Pipeline};
use super::server::AppState;
use crate::models::{Blog, Project};

/// Assemble all route groups with their pipelines.
pub fn router(authenticator: Arc<dyn Authenticator>, login_path: &str) -> Router<Arc<AppState>> {
    let public = Router::new()
        .merge(health::router())
        .merge(content::public_router::<Blog>())
        .merge(content::public_router::<Project>())
        .merge(content::project_router());

    let admin = Router::new()
        .merge(content::admin_router::<Blog>())
        .merge(content::admin_router::<Project>());

    Router::new()
        .merge(Pipeline::public().wrap(public))
        .merge(Pipeline::protected_api(authenticator.clone()).wrap(admin))
        .merge(Pipeline::dashboard(authenticator, login_path).wrap(dashboard::router()))
}
