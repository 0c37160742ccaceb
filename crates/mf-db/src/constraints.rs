//! Build table constraints from raw constraint rows

use crate::error::DbResult;
use crate::rows::RawConstraintRow;
use mf_core::{CoreError, ForeignConstraint, ForeignKey, TableConstraints, TableName};

const FOREIGN_KEY: &str = "FOREIGN KEY";
const PRIMARY_KEY: &str = "PRIMARY KEY";
const UNIQUE: &str = "UNIQUE";

/// Split a comma-separated column list, trimming and dropping empty tokens.
pub fn split_and_strip(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Group raw constraint rows into [`TableConstraints`].
///
/// Foreign keys without a referenced table or columns, or with a blank
/// referenced table, are skipped. A foreign
/// key whose column, referenced column and nullability lists differ in length
/// is rejected.
pub fn build_table_constraints(rows: &[RawConstraintRow]) -> DbResult<TableConstraints> {
    let mut constraints = TableConstraints::default();

    for row in rows {
        let table = TableName::build(&row.schema_name, &row.table_name);
        let columns = split_and_strip(&row.constraint_columns);

        match row.constraint_type.as_str() {
            FOREIGN_KEY => {
                let (Some(ref_table), Some(ref_columns)) = (
                    row.referenced_table
                        .as_deref()
                        .map(str::trim)
                        .filter(|t| !t.is_empty()),
                    row.referenced_columns.as_deref(),
                ) else {
                    log::warn!(
                        "Skipping foreign key {} on {}: no referenced table or columns",
                        row.constraint_name,
                        table
                    );
                    continue;
                };

                let ref_columns = split_and_strip(ref_columns);
                let not_nullable: Vec<bool> = split_and_strip(&row.constraint_columns_nullability)
                    .iter()
                    .map(|n| n.eq_ignore_ascii_case("NOT NULL"))
                    .collect();

                if columns.len() != ref_columns.len() {
                    return Err(mismatch(
                        row,
                        &table,
                        columns.len(),
                        ref_columns.len(),
                        "referenced columns",
                    )
                    .into());
                }
                if columns.len() != not_nullable.len() {
                    return Err(mismatch(
                        row,
                        &table,
                        columns.len(),
                        not_nullable.len(),
                        "nullability flags",
                    )
                    .into());
                }

                constraints
                    .foreign_keys
                    .entry(table)
                    .or_default()
                    .push(ForeignConstraint {
                        columns,
                        not_nullable,
                        foreign_key: ForeignKey {
                            table: TableName::new(ref_table),
                            columns: ref_columns,
                        },
                    });
            }
            PRIMARY_KEY => {
                let pks = constraints.primary_keys.entry(table).or_default();
                for col in columns {
                    if !pks.contains(&col) {
                        pks.push(col);
                    }
                }
            }
            UNIQUE => {
                constraints
                    .unique_constraints
                    .entry(table)
                    .or_default()
                    .push(dedupe(columns));
            }
            other => log::warn!(
                "Ignoring constraint {} of type '{}' on {}",
                row.constraint_name,
                other,
                table
            ),
        }
    }

    Ok(constraints)
}

fn mismatch(
    row: &RawConstraintRow,
    table: &TableName,
    columns: usize,
    other: usize,
    kind: &'static str,
) -> CoreError {
    CoreError::ForeignKeyColumnMismatch {
        table: table.to_string(),
        constraint: row.constraint_name.clone(),
        columns,
        other,
        kind,
    }
}

fn dedupe(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

#[cfg(test)]
#[path = "constraints_test.rs"]
mod tests;
