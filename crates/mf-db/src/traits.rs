//! Metadata querier trait definition

use crate::dialect::Dialect;
use crate::error::DbResult;
use crate::rows::{RawConstraintRow, RawPermissionRow, RawSchemaRow};
use async_trait::async_trait;

/// Raw metadata access for one source database.
///
/// One implementation exists per dialect. Any method may return
/// [`DbError::NoRows`](crate::DbError::NoRows) when the query matched nothing.
#[async_trait]
pub trait MetadataQuerier: Send + Sync {
    /// Every column of every table visible to the connection
    async fn database_schema(&self) -> DbResult<Vec<RawSchemaRow>>;

    /// Primary key, unique and foreign key rows of the given schemas
    async fn table_constraints(&self, schemas: &[String]) -> DbResult<Vec<RawConstraintRow>>;

    /// Privileges granted to the connecting role
    async fn role_permissions(&self) -> DbResult<Vec<RawPermissionRow>>;

    /// Run a `SELECT COUNT(*)` statement
    async fn query_count(&self, sql: &str) -> DbResult<i64>;

    /// Dialect of the source database
    fn dialect(&self) -> Dialect;
}
