//! Admin dashboard
//!
//! Browser-facing: wrapped by the redirecting auth pipeline. Unknown paths
//! bounce back to `/`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::db::{BlogRepo, ProjectRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Content totals shown on the dashboard
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub blogs: i64,
    pub projects: i64,
}

/// GET /
async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Json<DashboardSummary>, ApiError> {
    let blogs = BlogRepo::new(&state.pool).count().await?;
    let projects = ProjectRepo::new(&state.pool).count().await?;

    Ok(Json(DashboardSummary { blogs, projects }))
}

/// Any unmatched path
async fn back_to_dashboard() -> impl IntoResponse {
    (StatusCode::FOUND, [(LOCATION, "/")])
}

/// Dashboard routes, including the catch-all fallback
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(dashboard))
        .fallback(back_to_dashboard)
}
