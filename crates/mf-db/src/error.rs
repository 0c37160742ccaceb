//! Error types for mf-db

use mf_core::CoreError;
use thiserror::Error;

/// Metadata adapter errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Query returned no rows (D003)
    #[error("[D003] Query returned no rows")]
    NoRows,

    /// Snapshot could not be read or parsed (D004)
    #[error("[D004] Invalid metadata snapshot '{path}': {message}")]
    SnapshotError { path: String, message: String },

    /// Malformed metadata (D005)
    #[error("[D005] {0}")]
    Core(#[from] CoreError),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;
