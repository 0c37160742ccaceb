//! mf-plan - Sync plan compiler for Maskflow
//!
//! Turns a job's column mappings and the source database's metadata into an
//! ordered list of runs, each with the pipeline stages that anonymize its
//! rows: cache bridges for circular references, one mutation expression and
//! custom code blocks.

pub mod cache;
pub mod compiler;
pub mod error;
pub mod expr;
pub mod javascript;
pub mod mutation;
pub mod processor;
pub mod resolver;

pub use cache::{build_branch_cache_configs, cache_key, BranchConfig, CacheProcessorConfig};
pub use compiler::{PlanCompiler, SyncPlan, TablePlan};
pub use error::{PlanError, PlanResult};
pub use mutation::compute_mutation_function;
pub use processor::{build_processor_configs, CompileContext, ProcessorConfig};
pub use resolver::{resolve_transformer, MapDefinitionSource, TransformerDefinitionSource};
