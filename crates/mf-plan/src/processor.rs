//! Per-run pipeline stage assembly

use crate::cache::{build_branch_cache_configs, BranchConfig};
use crate::error::PlanResult;
use crate::expr::assignment;
use crate::javascript::build_javascript_block;
use crate::mutation::compute_mutation_function;
use crate::resolver::{resolve_transformer, TransformerDefinitionSource};
use mf_core::{
    CacheConfig, ColumnInfo, JobMapping, PrimaryKeyDependencyMap, RunConfig, SchemaColumnMap,
    Transformer,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One stage of a table's pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessorConfig {
    /// Newline-separated column assignments
    Mutation(String),
    /// A custom code block
    Javascript { code: String },
    /// Cache lookup merged back into the row
    Branch(BranchConfig),
}

/// Everything a run's stages are compiled against
pub struct CompileContext<'a> {
    pub job_id: &'a str,
    pub run_id: &'a str,
    pub cache: Option<&'a CacheConfig>,
    pub columns: &'a SchemaColumnMap,
    pub dependencies: &'a PrimaryKeyDependencyMap,
    pub definitions: &'a dyn TransformerDefinitionSource,
}

impl<'a> CompileContext<'a> {
    fn column_info(&self, run_config: &RunConfig, column: &str) -> Option<&'a ColumnInfo> {
        self.columns
            .get(&run_config.table)
            .and_then(|cols| cols.get(column))
    }

    /// Whether a column of the run's table is referenced from another table
    fn referenced_elsewhere(&self, run_config: &RunConfig, column: &str) -> bool {
        self.dependencies
            .get(&run_config.table)
            .and_then(|cols| cols.get(column))
            .is_some_and(|refs| refs.iter().any(|r| r.table != run_config.table))
    }
}

/// Compile the stages of one run, in order: cache branches, one mutation,
/// then one code block per custom code column.
///
/// Only mappings of columns the run writes are considered, ordered by column
/// position. An empty result means the rows are copied unchanged.
pub async fn build_processor_configs(
    ctx: &CompileContext<'_>,
    run_config: &RunConfig,
    mappings: &[JobMapping],
) -> PlanResult<Vec<ProcessorConfig>> {
    let mappings = ordered_mappings(ctx, run_config, mappings);
    let mut processors = Vec::new();

    if run_config.is_split_insert() {
        let references = ctx
            .dependencies
            .get(&run_config.table)
            .cloned()
            .unwrap_or_default();
        let owned: Vec<JobMapping> = mappings.iter().map(|m| (*m).clone()).collect();
        for branch in build_branch_cache_configs(
            &owned,
            &references,
            ctx.job_id,
            ctx.run_id,
            ctx.cache,
        )? {
            processors.push(ProcessorConfig::Branch(branch));
        }
    }

    let mut assignments = Vec::new();
    let mut code_blocks = Vec::new();

    for mapping in mappings {
        let transformer = resolve_transformer(ctx.definitions, &mapping.transformer).await?;
        if !transformer.should_process() {
            continue;
        }

        let is_primary_key = run_config.primary_keys.contains(&mapping.column);
        if is_primary_key
            && run_config.is_split_insert()
            && ctx.referenced_elsewhere(run_config, &mapping.column)
        {
            log::debug!(
                "Skipping mutation of {}.{}: value comes through the cache bridge",
                run_config.table,
                mapping.column
            );
            continue;
        }

        if let Some(code) = transformer.javascript_code() {
            let transform = matches!(transformer, Transformer::TransformJavascript(_));
            if let Some(block) = build_javascript_block(&mapping.column, code, transform) {
                code_blocks.push(ProcessorConfig::Javascript { code: block });
            }
            continue;
        }

        let info = ctx.column_info(run_config, &mapping.column);
        if let Some(expr) = compute_mutation_function(&mapping.column, &transformer, info)? {
            assignments.push(assignment(&mapping.column, &expr));
        }
    }

    if !assignments.is_empty() {
        processors.push(ProcessorConfig::Mutation(assignments.join("\n")));
    }
    processors.extend(code_blocks);

    Ok(processors)
}

/// Mappings of written columns, by column position; unknown columns last in
/// configured order
fn ordered_mappings<'m>(
    ctx: &CompileContext<'_>,
    run_config: &RunConfig,
    mappings: &'m [JobMapping],
) -> Vec<&'m JobMapping> {
    let mut selected: Vec<&JobMapping> = mappings
        .iter()
        .filter(|m| run_config.writes_column(&m.column))
        .collect();
    let positions: BTreeMap<&str, Option<i16>> = selected
        .iter()
        .map(|m| {
            let position = ctx
                .column_info(run_config, &m.column)
                .and_then(|info| info.ordinal_position);
            (m.column.as_str(), position)
        })
        .collect();
    selected.sort_by_key(|m| match positions.get(m.column.as_str()).copied().flatten() {
        Some(pos) => (0, pos),
        None => (1, 0),
    });
    selected
}

#[cfg(test)]
#[path = "processor_test.rs"]
mod tests;
