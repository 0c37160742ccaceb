//! Per-dialect identifier quoting and SQL fragments

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source database dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Postgres,
    Mysql,
    Mssql,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Postgres => write!(f, "postgres"),
            Dialect::Mysql => write!(f, "mysql"),
            Dialect::Mssql => write!(f, "mssql"),
        }
    }
}

impl Dialect {
    /// Quote a single identifier, escaping the closing quote character
    pub fn quote_identifier(&self, ident: &str) -> String {
        match self {
            Dialect::Postgres => format!("\"{}\"", ident.replace('"', "\"\"")),
            Dialect::Mysql => format!("`{}`", ident.replace('`', "``")),
            Dialect::Mssql => format!("[{}]", ident.replace(']', "]]")),
        }
    }

    /// Quote `schema.table` as two identifiers
    pub fn quote_table(&self, schema: &str, table: &str) -> String {
        format!(
            "{}.{}",
            self.quote_identifier(schema),
            self.quote_identifier(table)
        )
    }

    /// Identity syntax assumed for identity columns that report none
    pub fn default_identity(&self) -> &'static str {
        match self {
            Dialect::Postgres => "BY DEFAULT",
            Dialect::Mysql => "AUTO_INCREMENT",
            Dialect::Mssql => "IDENTITY(1,1)",
        }
    }

    /// `SELECT COUNT(*)` over a table with an optional filter.
    ///
    /// A blank filter is ignored.
    pub fn row_count_query(&self, schema: &str, table: &str, where_clause: Option<&str>) -> String {
        let mut sql = format!("SELECT COUNT(*) FROM {}", self.quote_table(schema, table));
        if let Some(filter) = where_clause.map(str::trim).filter(|w| !w.is_empty()) {
            sql.push_str(" WHERE ");
            sql.push_str(filter);
        }
        sql
    }
}
