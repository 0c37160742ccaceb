//! Error types for mf-plan

use mf_core::CoreError;
use mf_db::DbError;
use thiserror::Error;

/// Plan compilation errors
#[derive(Error, Debug)]
pub enum PlanError {
    /// P001: Transformer parameters cannot produce a valid expression
    #[error("[P001] Invalid transformer config for column '{column}': {message}")]
    InvalidTransformerConfig { column: String, message: String },

    /// P002: User-defined transformer lookup failed
    #[error("[P002] Unable to look up user-defined transformer '{id}': {message}")]
    TransformerLookup { id: String, message: String },

    /// P003: User-defined transformers reference each other in a loop
    #[error("[P003] User-defined transformer definitions form a cycle: {chain}")]
    UserDefinedCycle { chain: String },

    /// P004: A circular reference needs the bridge cache but none is configured
    #[error("[P004] Column {table}.{column} is referenced circularly and needs a cache, but no cache is configured")]
    MissingCacheConfig { table: String, column: String },

    /// P005: Compilation was cancelled
    #[error("[P005] Plan compilation cancelled")]
    Cancelled,

    /// Core error
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Metadata error
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Result type alias for PlanError
pub type PlanResult<T> = Result<T, PlanError>;
