//! Database connection pool management
//!
//! Uses the sqlx `Any` driver so the same repositories run against
//! PostgreSQL in production and SQLite in tests.

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Create a connection pool for `database_url`.
///
/// # Errors
///
/// Returns an error if the connection fails.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/prosamik").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<AnyPool, sqlx::Error> {
    create_pool_with_options(database_url, DEFAULT_MAX_CONNECTIONS).await
}

/// Create a connection pool with custom options.
///
/// # Arguments
///
/// * `database_url` - `postgres://...` or `sqlite://...` connection string
/// * `max_connections` - Maximum number of connections in the pool
pub async fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
) -> Result<AnyPool, sqlx::Error> {
    sqlx::any::install_default_drivers();

    AnyPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
