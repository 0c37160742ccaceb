//! Metadata querier backed by a JSON snapshot of raw rows

use crate::dialect::Dialect;
use crate::error::{DbError, DbResult};
use crate::rows::{RawConstraintRow, RawPermissionRow, RawSchemaRow};
use crate::traits::MetadataQuerier;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Raw metadata captured from a source database
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetadataSnapshot {
    pub dialect: Dialect,
    #[serde(default)]
    pub schema_rows: Vec<RawSchemaRow>,
    #[serde(default)]
    pub constraint_rows: Vec<RawConstraintRow>,
    #[serde(default)]
    pub permission_rows: Vec<RawPermissionRow>,
    /// Recorded results of `SELECT COUNT(*)` statements, keyed by SQL text
    #[serde(default)]
    pub row_counts: BTreeMap<String, i64>,
}

/// Replays a [`MetadataSnapshot`]. Empty row sets are reported as no rows,
/// like a live driver would.
#[derive(Debug, Clone)]
pub struct SnapshotQuerier {
    snapshot: MetadataSnapshot,
}

impl SnapshotQuerier {
    pub fn new(snapshot: MetadataSnapshot) -> Self {
        Self { snapshot }
    }

    /// Parse a snapshot from JSON text
    pub fn from_json(json: &str) -> DbResult<Self> {
        let snapshot = serde_json::from_str(json).map_err(|e| DbError::SnapshotError {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::new(snapshot))
    }

    /// Read and parse a snapshot file
    pub async fn load(path: &Path) -> DbResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DbError::SnapshotError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        let snapshot = serde_json::from_str(&content).map_err(|e| DbError::SnapshotError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::new(snapshot))
    }

    pub fn snapshot(&self) -> &MetadataSnapshot {
        &self.snapshot
    }
}

fn non_empty<T>(rows: Vec<T>) -> DbResult<Vec<T>> {
    if rows.is_empty() {
        Err(DbError::NoRows)
    } else {
        Ok(rows)
    }
}

#[async_trait]
impl MetadataQuerier for SnapshotQuerier {
    async fn database_schema(&self) -> DbResult<Vec<RawSchemaRow>> {
        non_empty(self.snapshot.schema_rows.clone())
    }

    async fn table_constraints(&self, schemas: &[String]) -> DbResult<Vec<RawConstraintRow>> {
        non_empty(
            self.snapshot
                .constraint_rows
                .iter()
                .filter(|row| schemas.contains(&row.schema_name))
                .cloned()
                .collect(),
        )
    }

    async fn role_permissions(&self) -> DbResult<Vec<RawPermissionRow>> {
        non_empty(self.snapshot.permission_rows.clone())
    }

    async fn query_count(&self, sql: &str) -> DbResult<i64> {
        self.snapshot
            .row_counts
            .get(sql)
            .copied()
            .ok_or_else(|| DbError::ExecutionError(format!("no recorded result for query: {sql}")))
    }

    fn dialect(&self) -> Dialect {
        self.snapshot.dialect
    }
}
