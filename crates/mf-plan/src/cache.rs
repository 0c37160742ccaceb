//! Cache bridge for circularly referenced columns
//!
//! When a table is inserted in two passes, rows in other tables that point
//! at its key columns must see the transformed key. The transformed value is
//! read back from a shared key/value cache through a branch stage.

use crate::error::{PlanError, PlanResult};
use crate::expr::{quote_column, string_literal, this_column};
use mf_core::{compute_checksum, CacheConfig, CacheKind, JobMapping, ReferenceKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cache command used to read bridged values
pub const CACHE_COMMAND: &str = "hget";

/// A stage that looks a value up in the bridge cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheProcessorConfig {
    pub url: String,
    pub command: String,
    pub args_mapping: String,
    pub kind: CacheKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master: Option<String>,
}

/// A side branch: build a request from the row, run the cache stage, merge
/// the result back into the row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchConfig {
    pub request_map: String,
    pub result_map: String,
    pub cache: CacheProcessorConfig,
}

/// Cache key for one referencing column of one run
pub fn cache_key(job_id: &str, run_id: &str, table: &str, column: &str) -> String {
    compute_checksum(&format!("{job_id}.{run_id}.{table}.{column}"))
}

/// Build branch stages for mapped columns referenced from other tables.
///
/// `references` maps a column of the mappings' table to the columns that
/// reference it. Self references need no bridge. Columns without outside
/// references produce nothing, even when no cache is configured.
pub fn build_branch_cache_configs(
    columns: &[JobMapping],
    references: &BTreeMap<String, Vec<ReferenceKey>>,
    job_id: &str,
    run_id: &str,
    cache: Option<&CacheConfig>,
) -> PlanResult<Vec<BranchConfig>> {
    let mut branches = Vec::new();

    for mapping in columns {
        let Some(refs) = references.get(&mapping.column) else {
            continue;
        };
        let table = mapping.table_name();

        for reference in refs.iter().filter(|r| r.table != table) {
            let Some(cache) = cache else {
                return Err(PlanError::MissingCacheConfig {
                    table: table.to_string(),
                    column: mapping.column.clone(),
                });
            };

            let key = cache_key(job_id, run_id, &reference.table, &reference.column);
            log::debug!(
                "Bridging {}.{} for {}.{} through the cache",
                table,
                mapping.column,
                reference.table,
                reference.column
            );

            branches.push(BranchConfig {
                request_map: format!(
                    "root = if {} == null {{ deleted() }} else {{ this }}",
                    this_column(&mapping.column)
                ),
                result_map: format!("root.{} = this", quote_column(&mapping.column)),
                cache: CacheProcessorConfig {
                    url: cache.url.clone(),
                    command: CACHE_COMMAND.to_string(),
                    args_mapping: format!(
                        "root = [{}, json({})]",
                        string_literal(&key),
                        string_literal(&mapping.column)
                    ),
                    kind: cache.kind,
                    master: cache.master.clone(),
                },
            });
        }
    }

    Ok(branches)
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
