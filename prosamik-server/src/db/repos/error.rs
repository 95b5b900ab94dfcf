//! Repository error type

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Statement preparation, execution or row decoding failed.
    #[error("{resource} {op} failed: {source}")]
    Persistence {
        resource: &'static str,
        op: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// An update or delete matched no row.
    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: i64 },
}

impl DbError {
    /// Adapter for `map_err` that tags a store error with where it happened.
    pub(crate) fn persistence(
        resource: &'static str,
        op: &'static str,
    ) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Persistence {
            resource,
            op,
            source,
        }
    }
}
