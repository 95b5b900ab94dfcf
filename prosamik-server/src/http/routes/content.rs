//! Content endpoints, generic over the entity variant
//!
//! Public reads live under `/{table}`, writes under `/admin/{table}`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::{ContentRepo, ProjectRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, QueryParams, ValidId};
use crate::http::server::AppState;
use crate::models::{ContentDraft, Entity, Project};

/// `?q=` for search
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// `?title=` for title lookup
#[derive(Debug, Deserialize)]
pub struct TitleParams {
    pub title: String,
}

/// `?path=` for project path lookup
#[derive(Debug, Deserialize)]
pub struct PathParams {
    pub path: String,
}

/// Acknowledgement for writes that return no entity
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// GET /{table} - all entities, newest first
async fn list<E: Entity>(State(state): State<Arc<AppState>>) -> Result<Json<Vec<E>>, ApiError> {
    let items = ContentRepo::<E>::new(&state.pool).list().await?;
    Ok(Json(items))
}

/// GET /{table}/search?q=
async fn search<E: Entity>(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<Json<Vec<E>>, ApiError> {
    let items = ContentRepo::<E>::new(&state.pool).search(&params.q).await?;
    Ok(Json(items))
}

/// GET /{table}/by-title?title=
async fn get_by_title<E: Entity>(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<TitleParams>,
) -> Result<Json<E>, ApiError> {
    ContentRepo::<E>::new(&state.pool)
        .get_by_title(&params.title)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound {
            resource: E::RESOURCE,
            id: params.title,
        })
}

/// GET /{table}/{id}
async fn get_one<E: Entity>(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<E>, ApiError> {
    ContentRepo::<E>::new(&state.pool)
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound {
            resource: E::RESOURCE,
            id: id.to_string(),
        })
}

/// GET /projects/by-path?path=
async fn get_project_by_path(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<PathParams>,
) -> Result<Json<Project>, ApiError> {
    ProjectRepo::new(&state.pool)
        .get_by_path(&params.path)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound {
            resource: <Project as Entity>::RESOURCE,
            id: params.path,
        })
}

/// POST /admin/{table}
async fn create<E: Entity>(
    State(state): State<Arc<AppState>>,
    JsonBody(draft): JsonBody<ContentDraft>,
) -> Result<(StatusCode, Json<E>), ApiError> {
    draft.validate()?;
    let created = ContentRepo::<E>::new(&state.pool)
        .create(&E::from_draft(0, draft))
        .await?;

    tracing::info!(resource = E::RESOURCE, id = created.id(), "content created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /admin/{table}/{id}
async fn update<E: Entity>(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    JsonBody(draft): JsonBody<ContentDraft>,
) -> Result<Json<MessageResponse>, ApiError> {
    draft.validate()?;
    ContentRepo::<E>::new(&state.pool)
        .update(&E::from_draft(id, draft))
        .await?;

    tracing::info!(resource = E::RESOURCE, id, "content updated");
    Ok(Json(MessageResponse {
        success: true,
        message: format!("{} {} updated", E::RESOURCE, id),
    }))
}

/// DELETE /admin/{table}/{id}
async fn delete<E: Entity>(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<MessageResponse>, ApiError> {
    ContentRepo::<E>::new(&state.pool).delete(id).await?;

    tracing::info!(resource = E::RESOURCE, id, "content deleted");
    Ok(Json(MessageResponse {
        success: true,
        message: format!("{} {} deleted", E::RESOURCE, id),
    }))
}

/// Read routes for one variant
pub fn public_router<E: Entity>() -> Router<Arc<AppState>> {
    let base = format!("/{}", E::TABLE);

    Router::new()
        .route(&base, get(list::<E>))
        .route(&format!("{base}/search"), get(search::<E>))
        .route(&format!("{base}/by-title"), get(get_by_title::<E>))
        .route(&format!("{base}/{{id}}"), get(get_one::<E>))
}

/// Project-only read routes
pub fn project_router() -> Router<Arc<AppState>> {
    Router::new().route("/projects/by-path", get(get_project_by_path))
}

/// Write routes for one variant
pub fn admin_router<E: Entity>() -> Router<Arc<AppState>> {
    let base = format!("/admin/{}", E::TABLE);

    Router::new()
        .route(&base, post(create::<E>))
        .route(&format!("{base}/{{id}}"), put(update::<E>).delete(delete::<E>))
}
