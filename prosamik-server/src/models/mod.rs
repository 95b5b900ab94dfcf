//! Domain models
//!
//! Entities are plain data; validation applies only to caller input
//! (drafts) and returns ValidationError, never panics.

pub mod content;
pub mod validation;

pub use content::{normalize, Blog, ContentDraft, ContentFields, Entity, Project, COLUMNS};
pub use validation::ValidationError;
