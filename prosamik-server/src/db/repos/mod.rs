//! Repository implementations for database access
//!
//! A single generic [`ContentRepo`] serves every content variant; the
//! aliases below are the instantiations handlers use.

pub mod content;
pub mod error;

pub use content::ContentRepo;
pub use error::DbError;

use crate::models::{Blog, Project};

/// Blog post repository
pub type BlogRepo<'a> = ContentRepo<'a, Blog>;

/// Project repository
pub type ProjectRepo<'a> = ContentRepo<'a, Project>;
