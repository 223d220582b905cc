//! Error types for corkboard.

use thiserror::Error;

use crate::auth::{AuthorizationError, SessionError};

/// Common error type for corkboard.
#[derive(Error, Debug)]
pub enum CorkboardError {
    /// Caller-supplied data violates a precondition.
    ///
    /// Always detected before any write.
    #[error("validation error: {0}")]
    Validation(String),

    /// Caller is not the owner of the target, or is not authenticated.
    #[error("authorization error: {0}")]
    Authorization(#[from] AuthorizationError),

    /// Referenced record does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// File storage failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Backing store failure.
    ///
    /// Errors from sqlx are converted automatically.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Session lookup failure.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CorkboardError {
    /// Build a `NotFound` error for an entity kind and id.
    pub fn not_found(kind: &str, id: i64) -> Self {
        CorkboardError::NotFound(format!("{kind} {id}"))
    }
}

impl From<sqlx::Error> for CorkboardError {
    fn from(e: sqlx::Error) -> Self {
        CorkboardError::Persistence(e.to_string())
    }
}

/// Result type alias for corkboard operations.
pub type Result<T> = std::result::Result<T, CorkboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = CorkboardError::Validation("title is empty".to_string());
        assert_eq!(err.to_string(), "validation error: title is empty");
    }

    #[test]
    fn test_not_found_display() {
        let err = CorkboardError::not_found("board", 7);
        assert_eq!(err.to_string(), "board 7 not found");
    }

    #[test]
    fn test_authorization_conversion() {
        let err: CorkboardError = AuthorizationError::NotAuthenticated.into();
        assert!(matches!(
            err,
            CorkboardError::Authorization(AuthorizationError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CorkboardError = io_err.into();
        assert!(matches!(err, CorkboardError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_sqlx_error_conversion() {
        let err: CorkboardError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, CorkboardError::Persistence(_)));
    }
}
