//! Raw metadata rows as returned by a dialect's introspection queries

use mf_core::ColumnInfo;
use serde::{Deserialize, Serialize};

/// One column of the information schema, before normalization.
///
/// Numeric fields mirror the database types: SQL NULL is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSchemaRow {
    pub table_schema: String,
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
    #[serde(default)]
    pub column_default: Option<String>,
    /// `YES` / `NO` as reported by the information schema
    #[serde(default = "default_nullable")]
    pub is_nullable: String,
    pub ordinal_position: i64,
    #[serde(default)]
    pub character_maximum_length: Option<i32>,
    #[serde(default)]
    pub numeric_precision: Option<i16>,
    #[serde(default)]
    pub numeric_scale: Option<i16>,
    #[serde(default)]
    pub is_identity: bool,
    /// Explicit identity syntax, when the dialect reports one
    #[serde(default)]
    pub identity_generation: Option<String>,
    #[serde(default)]
    pub generation_expression: Option<String>,
}

fn default_nullable() -> String {
    "YES".to_string()
}

/// One constraint row. Column lists are comma-separated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawConstraintRow {
    pub schema_name: String,
    pub table_name: String,
    #[serde(default)]
    pub constraint_name: String,
    /// `FOREIGN KEY`, `PRIMARY KEY` or `UNIQUE`
    pub constraint_type: String,
    pub constraint_columns: String,
    /// Per-column `NULL` / `NOT NULL`, foreign keys only
    #[serde(default)]
    pub constraint_columns_nullability: String,
    /// Schema-qualified referenced table, foreign keys only
    #[serde(default)]
    pub referenced_table: Option<String>,
    #[serde(default)]
    pub referenced_columns: Option<String>,
}

/// One granted privilege on a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPermissionRow {
    pub table_schema: String,
    pub table_name: String,
    pub privilege_type: String,
}

/// A normalized column row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSchemaRow {
    pub table_schema: String,
    pub table_name: String,
    pub column_name: String,
    pub info: ColumnInfo,
}
