//! Storage layer error types
//!
//! Defines all errors that can occur while talking to the database.

use thiserror::Error;

/// Errors that can occur in the storage layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// SQLite statement or transaction failed
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// File system operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Could not check a connection out of the pool
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Referenced row does not exist
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A unique field already holds the requested value
    #[error("{0}")]
    Conflict(String),

    /// Serialization/deserialization of a stored column failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Blocking database task panicked or was cancelled
    #[error("Database task failed: {0}")]
    Task(String),
}

impl StorageError {
    /// Shorthand for a missing row
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        StorageError::NotFound { entity, id }
    }

    /// Whether this error came from a UNIQUE constraint
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Sqlite(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        )
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<tokio::task::JoinError> for StorageError {
    fn from(err: tokio::task::JoinError) -> Self {
        StorageError::Task(err.to_string())
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::not_found("Subject", 7);
        assert_eq!(err.to_string(), "Subject with id 7 not found");

        let err = StorageError::Conflict("Subject with this name already exists".to_string());
        assert_eq!(err.to_string(), "Subject with this name already exists");
    }

    #[test]
    fn test_unique_violation_detection() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (name TEXT UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();

        let err: StorageError = conn
            .execute("INSERT INTO t VALUES ('a')", [])
            .unwrap_err()
            .into();
        assert!(err.is_unique_violation());

        let err = StorageError::not_found("Lecture", 1);
        assert!(!err.is_unique_violation());
    }
}
