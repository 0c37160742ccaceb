//! mf-core - Core library for Maskflow
//!
//! This crate provides the shared types of the sync plan compiler (table
//! names, column metadata, constraints, run configs, job mappings and the
//! transformer catalogue), job configuration parsing, the table dependency
//! resolver and the schema drift guard.

pub mod checksum;
pub mod column;
pub mod config;
pub mod constraint;
pub mod dag;
pub mod drift;
pub mod error;
pub mod mapping;
pub mod run_config;
pub(crate) mod serde_helpers;
pub mod table_name;
pub mod transformer;

pub use checksum::compute_checksum;
pub use column::{ordered_column_names, ColumnInfo, SchemaColumnMap};
pub use config::{CacheConfig, CacheKind, JobConfig};
pub use constraint::{
    ForeignConstraint, ForeignKey, PrimaryKeyDependencyMap, ReferenceKey, TableConstraints,
};
pub use dag::{
    find_circular_dependencies, primary_key_dependency_map, resolve_run_configs, TableDag,
};
pub use drift::{check_drift, is_subset, should_halt};
pub use error::{CoreError, CoreResult};
pub use mapping::{group_mappings_by_table, JobMapping, TableMapping};
pub use run_config::{DependsOn, RunConfig, RunType};
pub use table_name::TableName;
pub use transformer::Transformer;
