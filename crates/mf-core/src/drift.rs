//! Schema drift guard
//!
//! Compares the configured job mappings against the live schema before a
//! plan is compiled. Two kinds of drift are detected:
//!
//! - a mapping names a column that no longer exists ([`is_subset`] fails),
//! - a table that is in scope (at least one column mapped) has live columns
//!   that are not mapped ([`should_halt`] is true). Such a column would be
//!   copied without anonymization.
//!
//! Tables present in the schema but absent from the mappings are opted out
//! and never flagged.

use crate::column::SchemaColumnMap;
use crate::error::{CoreError, CoreResult};
use crate::mapping::JobMapping;
use crate::table_name::TableName;
use std::collections::{BTreeMap, BTreeSet};

/// True when every mapped (schema, table, column) exists in the live schema.
pub fn is_subset(schema: &SchemaColumnMap, mappings: &[JobMapping]) -> bool {
    missing_columns(schema, mappings).is_empty()
}

/// True when a mapped table's live columns differ from its mapped columns.
pub fn should_halt(schema: &SchemaColumnMap, mappings: &[JobMapping]) -> bool {
    let mapped = mapped_columns_by_table(mappings);
    for (table, columns) in &mapped {
        let Some(live) = schema.get(table) else {
            continue;
        };
        if live.len() != columns.len() {
            return true;
        }
        if live.keys().any(|col| !columns.contains(col.as_str())) {
            return true;
        }
    }
    false
}

/// Mapped columns that are absent from the live schema, as `schema.table.column`.
pub fn missing_columns(schema: &SchemaColumnMap, mappings: &[JobMapping]) -> Vec<String> {
    mappings
        .iter()
        .filter(|m| {
            schema
                .get(&m.table_name())
                .map_or(true, |cols| !cols.contains_key(&m.column))
        })
        .map(|m| format!("{}.{}.{}", m.schema, m.table, m.column))
        .collect()
}

/// Live columns of in-scope tables that have no mapping, as `schema.table.column`.
pub fn unmapped_columns(schema: &SchemaColumnMap, mappings: &[JobMapping]) -> Vec<String> {
    let mapped = mapped_columns_by_table(mappings);
    let mut out = Vec::new();
    for (table, columns) in &mapped {
        let Some(live) = schema.get(table) else {
            continue;
        };
        for col in live.keys() {
            if !columns.contains(col.as_str()) {
                out.push(format!("{table}.{col}"));
            }
        }
    }
    out
}

/// Run both drift checks, failing the compilation on drift.
///
/// With `halt_on_new_column` disabled, unmapped live columns are only
/// logged; stale mappings always fail.
pub fn check_drift(
    schema: &SchemaColumnMap,
    mappings: &[JobMapping],
    halt_on_new_column: bool,
) -> CoreResult<()> {
    let missing = missing_columns(schema, mappings);
    if !missing.is_empty() {
        return Err(CoreError::SchemaDrift {
            columns: missing.join(", "),
        });
    }

    if should_halt(schema, mappings) {
        let unmapped = unmapped_columns(schema, mappings);
        if halt_on_new_column {
            return Err(CoreError::UnmappedColumns {
                columns: unmapped.join(", "),
            });
        }
        log::warn!(
            "Live schema has unmapped columns that will be copied verbatim: {}",
            unmapped.join(", ")
        );
    }

    Ok(())
}

fn mapped_columns_by_table(mappings: &[JobMapping]) -> BTreeMap<TableName, BTreeSet<&str>> {
    let mut out: BTreeMap<TableName, BTreeSet<&str>> = BTreeMap::new();
    for m in mappings {
        out.entry(m.table_name())
            .or_default()
            .insert(m.column.as_str());
    }
    out
}

#[cfg(test)]
#[path = "drift_test.rs"]
mod tests;
