//! Error types for mf-core

use thiserror::Error;

/// Core error type for Maskflow
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Job file not found
    #[error("[E001] Job file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid job configuration value
    #[error("[E002] Invalid job config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Table name is not schema-qualified
    #[error("[E003] Invalid table name '{name}': expected 'schema.table'")]
    InvalidTableName { name: String },

    /// C001: Foreign key row has mismatched column arrays
    #[error("[C001] Foreign key {constraint} on {table} has {columns} columns but {other} {kind}")]
    ForeignKeyColumnMismatch {
        table: String,
        constraint: String,
        columns: usize,
        other: usize,
        kind: &'static str,
    },

    /// C002: Cycle that cannot be broken by deferring a nullable foreign key
    #[error("[C002] Unsupported circular dependency: {cycle}. At least one foreign key in the cycle must be nullable")]
    UnsupportedCircularDependency { cycle: String },

    /// C003: Job mappings reference columns missing from the live schema
    #[error("[C003] Schema has diverged from configuration; mapped columns no longer exist: {columns}")]
    SchemaDrift { columns: String },

    /// C004: Live schema has columns the job does not map
    #[error("[C004] Schema has diverged from configuration; unmapped columns on in-scope tables: {columns}")]
    UnmappedColumns { columns: String },

    /// E004: IO error with file path context
    #[error("[E004] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E005: YAML parse error
    #[error("[E005] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
