//! Column metadata as reported by the source database

use crate::table_name::TableName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata for a single live column, keyed elsewhere by (table, column).
///
/// Length, precision and scale are `None` when the database reported no
/// value for the column; a reported zero or negative value is kept as-is so
/// callers can tell the two apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// 1-based position of the column in its table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal_position: Option<i16>,

    /// Whether the column accepts NULL
    #[serde(default)]
    pub is_nullable: bool,

    /// Database type name (e.g. "varchar", "int4")
    #[serde(default)]
    pub data_type: String,

    /// Default expression, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_default: Option<String>,

    /// Maximum character length for string columns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_maximum_length: Option<i32>,

    /// Numeric precision for numeric columns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_precision: Option<i32>,

    /// Numeric scale for numeric columns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_scale: Option<i32>,

    /// Identity generation syntax when the column is an identity column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_generation: Option<String>,

    /// Generation expression for generated (computed) columns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_type: Option<String>,
}

impl ColumnInfo {
    /// Character max length when the database reported a positive bound.
    pub fn positive_max_length(&self) -> Option<i64> {
        self.character_maximum_length
            .filter(|len| *len > 0)
            .map(i64::from)
    }
}

/// Live schema: table → column name → column metadata.
pub type SchemaColumnMap = BTreeMap<TableName, BTreeMap<String, ColumnInfo>>;

/// Column names of a table ordered by ordinal position.
///
/// Columns without a position sort last, by name.
pub fn ordered_column_names(columns: &BTreeMap<String, ColumnInfo>) -> Vec<String> {
    let mut names: Vec<(&String, Option<i16>)> = columns
        .iter()
        .map(|(name, info)| (name, info.ordinal_position))
        .collect();
    names.sort_by(|a, b| (a.1.is_none(), a.1, a.0).cmp(&(b.1.is_none(), b.1, b.0)));
    names.into_iter().map(|(name, _)| name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(pos: Option<i16>) -> ColumnInfo {
        ColumnInfo {
            ordinal_position: pos,
            ..Default::default()
        }
    }

    #[test]
    fn test_positive_max_length() {
        let mut info = ColumnInfo::default();
        assert_eq!(info.positive_max_length(), None);
        info.character_maximum_length = Some(0);
        assert_eq!(info.positive_max_length(), None);
        info.character_maximum_length = Some(-1);
        assert_eq!(info.positive_max_length(), None);
        info.character_maximum_length = Some(40);
        assert_eq!(info.positive_max_length(), Some(40));
    }

    #[test]
    fn test_ordered_column_names() {
        let mut columns = BTreeMap::new();
        columns.insert("name".to_string(), col(Some(2)));
        columns.insert("id".to_string(), col(Some(1)));
        columns.insert("zz_extra".to_string(), col(None));
        columns.insert("aa_extra".to_string(), col(None));
        assert_eq!(
            ordered_column_names(&columns),
            vec!["id", "name", "aa_extra", "zz_extra"]
        );
    }
}
