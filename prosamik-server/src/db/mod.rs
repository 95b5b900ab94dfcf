//! Database layer - connection pool and repositories
//!
//! # Design Principles
//!
//! - One shared pool; every repository call checks out its own connection
//! - Statements are prepared per call and released with the connection
//! - No check-then-write: affected-row counts decide NotFound

pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;
