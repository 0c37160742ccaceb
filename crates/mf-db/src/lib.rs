//! mf-db - Schema metadata adapter for Maskflow
//!
//! This crate provides the `MetadataQuerier` trait implemented once per
//! source dialect, the `SqlManager` that normalizes raw metadata rows into
//! column maps and table constraints, and a snapshot-backed querier.

pub mod constraints;
pub mod dialect;
pub mod error;
pub mod manager;
pub mod rows;
pub mod snapshot;
pub mod traits;

pub use constraints::build_table_constraints;
pub use dialect::Dialect;
pub use error::{DbError, DbResult};
pub use manager::{RolePermissionsMap, SqlManager};
pub use rows::{DatabaseSchemaRow, RawConstraintRow, RawPermissionRow, RawSchemaRow};
pub use snapshot::{MetadataSnapshot, SnapshotQuerier};
pub use traits::MetadataQuerier;
