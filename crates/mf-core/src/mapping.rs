//! Configured column mappings of a sync job

use crate::table_name::TableName;
use crate::transformer::Transformer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The transformer chosen for one (schema, table, column)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobMapping {
    pub schema: String,
    pub table: String,
    pub column: String,
    #[serde(default)]
    pub transformer: Transformer,
}

impl JobMapping {
    /// Mapping with the given transformer
    pub fn new(schema: &str, table: &str, column: &str, transformer: Transformer) -> Self {
        Self {
            schema: schema.to_string(),
            table: table.to_string(),
            column: column.to_string(),
            transformer,
        }
    }

    /// Schema-qualified table this mapping belongs to
    pub fn table_name(&self) -> TableName {
        TableName::build(&self.schema, &self.table)
    }
}

/// Mappings of a single table, in configured order
#[derive(Debug, Clone, PartialEq)]
pub struct TableMapping {
    pub schema: String,
    pub table: String,
    pub mappings: Vec<JobMapping>,
}

impl TableMapping {
    /// Mapped column names, in configured order
    pub fn column_names(&self) -> Vec<String> {
        self.mappings.iter().map(|m| m.column.clone()).collect()
    }

    /// Look up the mapping for a column
    pub fn get(&self, column: &str) -> Option<&JobMapping> {
        self.mappings.iter().find(|m| m.column == column)
    }
}

/// Group mappings by their schema-qualified table.
pub fn group_mappings_by_table(mappings: &[JobMapping]) -> BTreeMap<TableName, TableMapping> {
    let mut grouped: BTreeMap<TableName, TableMapping> = BTreeMap::new();
    for mapping in mappings {
        grouped
            .entry(mapping.table_name())
            .or_insert_with(|| TableMapping {
                schema: mapping.schema.clone(),
                table: mapping.table.clone(),
                mappings: Vec::new(),
            })
            .mappings
            .push(mapping.clone());
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_mappings_by_table() {
        let mappings = vec![
            JobMapping::new("public", "users", "id", Transformer::Passthrough),
            JobMapping::new("public", "orders", "id", Transformer::Passthrough),
            JobMapping::new("public", "users", "name", Transformer::GenerateNull),
        ];
        let grouped = group_mappings_by_table(&mappings);
        assert_eq!(grouped.len(), 2);
        let users = &grouped["public.users"];
        assert_eq!(users.column_names(), vec!["id", "name"]);
        assert_eq!(
            users.get("name").map(|m| &m.transformer),
            Some(&Transformer::GenerateNull)
        );
    }

    #[test]
    fn test_mapping_without_transformer_is_unspecified() {
        let m: JobMapping =
            serde_yaml::from_str("{ schema: public, table: users, column: id }").unwrap();
        assert_eq!(m.transformer, Transformer::Unspecified);
        assert_eq!(m.table_name(), "public.users");
    }
}
