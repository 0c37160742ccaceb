//! Per-table execution units of a sync plan

use crate::table_name::TableName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a run inserts rows or back-fills deferred columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunType {
    /// Insert rows with every non-deferred column
    Insert,
    /// Update previously inserted rows with deferred foreign key columns
    Update,
}

impl fmt::Display for RunType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunType::Insert => write!(f, "insert"),
            RunType::Update => write!(f, "update"),
        }
    }
}

/// A table (and the columns on it) that must be written before a run starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependsOn {
    /// Table that must already be written
    pub table: TableName,
    /// Columns on that table the run relies on
    pub columns: Vec<String>,
}

/// One table's execution unit in the compiled plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Table written by this run
    pub table: TableName,

    /// Insert or update pass
    pub run_type: RunType,

    /// Primary key columns of the table
    pub primary_keys: Vec<String>,

    /// Optional row filter applied when reading the source table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<String>,

    /// Columns read from the source
    pub select_columns: Vec<String>,

    /// Columns written to the destination
    pub insert_columns: Vec<String>,

    /// Runs that must complete first
    pub depends_on: Vec<DependsOn>,

    /// True when the table's columns were split across an insert/update pair
    pub split_columns: bool,
}

impl RunConfig {
    /// Create a run config
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        table: impl Into<TableName>,
        run_type: RunType,
        primary_keys: Vec<String>,
        where_clause: Option<String>,
        select_columns: Vec<String>,
        insert_columns: Vec<String>,
        depends_on: Vec<DependsOn>,
        split_columns: bool,
    ) -> Self {
        Self {
            table: table.into(),
            run_type,
            primary_keys,
            where_clause,
            select_columns,
            insert_columns,
            depends_on,
            split_columns,
        }
    }

    /// Identifier used in logs and plan output, e.g. `public.users.insert`
    pub fn id(&self) -> String {
        format!("{}.{}", self.table, self.run_type)
    }

    /// The insert pass of a table whose circular foreign keys were deferred
    pub fn is_split_insert(&self) -> bool {
        self.split_columns && self.run_type == RunType::Insert
    }

    /// Whether this run writes the given column
    pub fn writes_column(&self, column: &str) -> bool {
        self.insert_columns.iter().any(|c| c == column)
    }
}
