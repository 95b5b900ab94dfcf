//! Validation error types

use std::fmt;

/// Validation error for caller input
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Field is empty (after trimming) when it shouldn't be
    Empty { field: &'static str },

    /// Field doesn't parse into the expected shape
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Request body or query string could not be decoded
    Malformed { field: &'static str, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::Malformed { field, reason } => write!(f, "malformed {}: {}", field, reason),
        }
    }
}

impl std::error::Error for ValidationError {}
