//! prosamik-server: content backend for blog posts and projects
//!
//! - `models`: the shared entity shape and its two variants
//! - `db`: connection pool and the generic content repository
//! - `http`: middleware pipelines, route table and server runner

pub mod db;
pub mod http;
pub mod models;

pub use db::{create_pool, BlogRepo, ContentRepo, DbError, ProjectRepo};
pub use http::{run_server, ServerConfig};
pub use models::{Blog, ContentDraft, Entity, Project};
