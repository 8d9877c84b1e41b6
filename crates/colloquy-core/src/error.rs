//! Error types for Colloquy Core

use thiserror::Error;

/// Main error type for Colloquy operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("List error: {0}")]
    List(#[from] ListError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Record store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Blocking task failed: {0}")]
    TaskJoin(String),
}

/// Conversation list errors.
///
/// These never leave the list component; they exist so that failures are
/// logged with a consistent shape before being swallowed.
#[derive(Error, Debug)]
pub enum ListError {
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("{op} failed: {reason}")]
    Mutation { op: &'static str, reason: String },
}

impl ListError {
    pub fn fetch(err: impl std::fmt::Display) -> Self {
        Self::Fetch(err.to_string())
    }

    pub fn mutation(op: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Mutation {
            op,
            reason: err.to_string(),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Store(StoreError::Database(err.to_string()))
    }
}

impl From<r2d2::Error> for Error {
    fn from(err: r2d2::Error) -> Self {
        Error::Store(StoreError::Pool(err.to_string()))
    }
}

impl serde::Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_error_display() {
        let err = ListError::mutation("rename", "Record not found: abc");
        assert_eq!(err.to_string(), "rename failed: Record not found: abc");
    }

    #[test]
    fn test_store_error_wraps() {
        let err: Error = StoreError::NotFound("abc".to_string()).into();
        assert_eq!(err.to_string(), "Storage error: Record not found: abc");
    }
}
