//! End-to-end plan compilation

use crate::error::{PlanError, PlanResult};
use crate::processor::{build_processor_configs, CompileContext, ProcessorConfig};
use crate::resolver::TransformerDefinitionSource;
use mf_core::{
    check_drift, group_mappings_by_table, ordered_column_names, primary_key_dependency_map,
    resolve_run_configs, ForeignConstraint, JobConfig, JobMapping, RunConfig, SchemaColumnMap,
    TableName,
};
use mf_db::{MetadataQuerier, SqlManager};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One run of the plan and the stages its rows pass through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePlan {
    pub run_config: RunConfig,
    #[serde(default)]
    pub processors: Vec<ProcessorConfig>,
}

/// A compiled sync plan, runs in execution order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPlan {
    pub job_id: String,
    pub run_id: String,
    pub tables: Vec<TablePlan>,
}

impl SyncPlan {
    /// Run ids in execution order, e.g. `public.users.insert`
    pub fn run_order(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.run_config.id()).collect()
    }

    /// Look up a run by table and pass
    pub fn find(&self, id: &str) -> Option<&TablePlan> {
        self.tables.iter().find(|t| t.run_config.id() == id)
    }
}

/// Compiles jobs against a source database's metadata.
pub struct PlanCompiler<Q, S> {
    manager: SqlManager<Q>,
    definitions: S,
    cancel: Arc<AtomicBool>,
}

impl<Q, S> PlanCompiler<Q, S>
where
    Q: MetadataQuerier,
    S: TransformerDefinitionSource,
{
    pub fn new(querier: Q, definitions: S) -> Self {
        Self {
            manager: SqlManager::new(querier),
            definitions,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share a cancellation flag with the caller
    pub fn with_cancellation(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn manager(&self) -> &SqlManager<Q> {
        &self.manager
    }

    /// Ordered run configs for the job's mapped tables.
    ///
    /// Fails on schema drift or on a cycle of required foreign keys.
    pub async fn resolve(&self, job: &JobConfig) -> PlanResult<Vec<RunConfig>> {
        Ok(self.prepare(job).await?.run_configs)
    }

    /// Compile a job into a plan for one run.
    pub async fn compile(&self, job: &JobConfig, run_id: &str) -> PlanResult<SyncPlan> {
        let prepared = self.prepare(job).await?;
        let grouped = group_mappings_by_table(&job.mappings);
        let dependencies = primary_key_dependency_map(&prepared.foreign_keys);

        let ctx = CompileContext {
            job_id: &job.job_id,
            run_id,
            cache: job.cache.as_ref(),
            columns: &prepared.columns,
            dependencies: &dependencies,
            definitions: &self.definitions,
        };

        let mut tables = Vec::with_capacity(prepared.run_configs.len());
        for run_config in prepared.run_configs {
            if self.cancel.load(Ordering::Relaxed) {
                log::info!("Compilation of job {} cancelled", job.job_id);
                return Err(PlanError::Cancelled);
            }

            let mappings: &[JobMapping] = grouped
                .get(&run_config.table)
                .map(|t| t.mappings.as_slice())
                .unwrap_or_default();
            let processors = build_processor_configs(&ctx, &run_config, mappings).await?;
            log::debug!(
                "Compiled {} with {} processor(s)",
                run_config.id(),
                processors.len()
            );
            tables.push(TablePlan {
                run_config,
                processors,
            });
        }

        log::info!(
            "Compiled job {} run {} into {} run(s)",
            job.job_id,
            run_id,
            tables.len()
        );

        Ok(SyncPlan {
            job_id: job.job_id.clone(),
            run_id: run_id.to_string(),
            tables,
        })
    }

    async fn prepare(&self, job: &JobConfig) -> PlanResult<Prepared> {
        let columns = self.manager.get_schema_column_map().await?;
        check_drift(&columns, &job.mappings, job.halt_on_new_column)?;

        let constraints = self
            .manager
            .get_table_constraints_by_schema(&job.effective_schemas())
            .await?;

        let tables: BTreeMap<TableName, Vec<String>> = group_mappings_by_table(&job.mappings)
            .into_keys()
            .filter_map(|table| {
                let live = columns.get(&table)?;
                let names = ordered_column_names(live);
                Some((table, names))
            })
            .collect();

        let run_configs = resolve_run_configs(&tables, &constraints, &job.subsets)?;
        log::debug!(
            "Resolved {} run(s) for {} table(s)",
            run_configs.len(),
            tables.len()
        );

        // references from tables outside the job never need a bridge
        let foreign_keys = constraints
            .foreign_keys
            .into_iter()
            .filter(|(table, _)| tables.contains_key(table))
            .collect();

        Ok(Prepared {
            columns,
            foreign_keys,
            run_configs,
        })
    }
}

/// Metadata and resolved runs shared by `resolve` and `compile`
struct Prepared {
    columns: SchemaColumnMap,
    foreign_keys: BTreeMap<TableName, Vec<ForeignConstraint>>,
    run_configs: Vec<RunConfig>,
}
