//! Primary key, unique and foreign key constraint model

use crate::table_name::TableName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The referenced side of a foreign key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Referenced table
    pub table: TableName,
    /// Referenced columns, in the same order as the referencing columns
    pub columns: Vec<String>,
}

/// A foreign key declared on a referencing table.
///
/// `columns[i]` references `foreign_key.columns[i]` and `not_nullable[i]`
/// describes `columns[i]`. The three lists are never reordered independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignConstraint {
    /// Referencing columns
    pub columns: Vec<String>,
    /// Per-column NOT NULL flag for the referencing columns
    pub not_nullable: Vec<bool>,
    /// Referenced table and columns
    pub foreign_key: ForeignKey,
}

impl ForeignConstraint {
    /// Iterate `(referencing column, referenced column)` pairs in key order.
    pub fn column_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .zip(self.foreign_key.columns.iter())
            .map(|(from, to)| (from.as_str(), to.as_str()))
    }

    /// A key can be deferred to a later update pass only when every
    /// referencing column accepts NULL.
    pub fn is_nullable(&self) -> bool {
        !self.not_nullable.iter().any(|nn| *nn)
    }
}

/// All constraints of the schemas in scope, keyed by table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConstraints {
    /// Foreign keys declared on each referencing table
    pub foreign_keys: BTreeMap<TableName, Vec<ForeignConstraint>>,
    /// Deduplicated primary key columns per table
    pub primary_keys: BTreeMap<TableName, Vec<String>>,
    /// Deduplicated column groups of each unique constraint per table
    pub unique_constraints: BTreeMap<TableName, Vec<Vec<String>>>,
}

impl TableConstraints {
    /// True when no constraints of any kind were found
    pub fn is_empty(&self) -> bool {
        self.foreign_keys.is_empty()
            && self.primary_keys.is_empty()
            && self.unique_constraints.is_empty()
    }

    /// Primary key columns of a table (empty when it has none)
    pub fn primary_keys_for(&self, table: &str) -> &[String] {
        self.primary_keys
            .get(table)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Back-reference from a referenced column to a column that points at it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReferenceKey {
    /// Referencing table
    pub table: TableName,
    /// Referencing column
    pub column: String,
}

/// Referenced table → referenced column → every column referencing it.
pub type PrimaryKeyDependencyMap = BTreeMap<TableName, BTreeMap<String, Vec<ReferenceKey>>>;

#[cfg(test)]
mod tests {
    use super::*;

    fn composite() -> ForeignConstraint {
        ForeignConstraint {
            columns: vec![
                "responsible_employee_id".to_string(),
                "responsible_department_id".to_string(),
            ],
            not_nullable: vec![true, false],
            foreign_key: ForeignKey {
                table: TableName::new("employees"),
                columns: vec!["employee_id".to_string(), "department_id".to_string()],
            },
        }
    }

    #[test]
    fn test_column_pairs_keep_key_order() {
        let fk = composite();
        let pairs: Vec<_> = fk.column_pairs().collect();
        assert_eq!(
            pairs,
            vec![
                ("responsible_employee_id", "employee_id"),
                ("responsible_department_id", "department_id"),
            ]
        );
    }

    #[test]
    fn test_composite_nullability_is_all_or_nothing() {
        let mut fk = composite();
        assert!(!fk.is_nullable());
        fk.not_nullable = vec![false, false];
        assert!(fk.is_nullable());
    }

    #[test]
    fn test_primary_keys_for_missing_table() {
        let constraints = TableConstraints::default();
        assert!(constraints.is_empty());
        assert!(constraints.primary_keys_for("public.users").is_empty());
    }
}
