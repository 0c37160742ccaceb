//! Normalizing layer over a [`MetadataQuerier`]

use crate::constraints::build_table_constraints;
use crate::dialect::Dialect;
use crate::error::{DbError, DbResult};
use crate::rows::{DatabaseSchemaRow, RawSchemaRow};
use crate::traits::MetadataQuerier;
use mf_core::{ColumnInfo, SchemaColumnMap, TableConstraints, TableName};
use std::collections::BTreeMap;

/// Table → privileges granted on it, in row order
pub type RolePermissionsMap = BTreeMap<TableName, Vec<String>>;

/// Turns a dialect's raw metadata rows into the compiler's model.
#[derive(Debug)]
pub struct SqlManager<Q> {
    querier: Q,
}

impl<Q: MetadataQuerier> SqlManager<Q> {
    /// Wrap a querier
    pub fn new(querier: Q) -> Self {
        Self { querier }
    }

    /// The wrapped querier
    pub fn querier(&self) -> &Q {
        &self.querier
    }

    /// Dialect of the source database
    pub fn dialect(&self) -> Dialect {
        self.querier.dialect()
    }

    /// Normalized column rows. No rows is an empty result.
    pub async fn get_database_schema(&self) -> DbResult<Vec<DatabaseSchemaRow>> {
        let rows = match self.querier.database_schema().await {
            Err(DbError::NoRows) => return Ok(Vec::new()),
            other => other?,
        };
        let dialect = self.dialect();
        Ok(rows.into_iter().map(|row| normalize_row(row, dialect)).collect())
    }

    /// Live schema keyed by table then column. The first row for a column wins.
    pub async fn get_schema_column_map(&self) -> DbResult<SchemaColumnMap> {
        let rows = self.get_database_schema().await?;
        let mut map = SchemaColumnMap::new();
        for row in rows {
            let table = TableName::build(&row.table_schema, &row.table_name);
            map.entry(table)
                .or_default()
                .entry(row.column_name)
                .or_insert(row.info);
        }
        Ok(map)
    }

    /// Constraints of the given schemas. No schemas or no rows is empty.
    pub async fn get_table_constraints_by_schema(
        &self,
        schemas: &[String],
    ) -> DbResult<TableConstraints> {
        if schemas.is_empty() {
            return Ok(TableConstraints::default());
        }
        let rows = match self.querier.table_constraints(schemas).await {
            Err(DbError::NoRows) => return Ok(TableConstraints::default()),
            other => other?,
        };
        log::debug!(
            "Loaded {} constraint rows for schemas {}",
            rows.len(),
            schemas.join(", ")
        );
        build_table_constraints(&rows)
    }

    /// Privileges of the connecting role per table
    pub async fn get_role_permissions_map(&self) -> DbResult<RolePermissionsMap> {
        let rows = match self.querier.role_permissions().await {
            Err(DbError::NoRows) => return Ok(RolePermissionsMap::new()),
            other => other?,
        };
        let mut map = RolePermissionsMap::new();
        for row in rows {
            map.entry(TableName::build(&row.table_schema, &row.table_name))
                .or_default()
                .push(row.privilege_type);
        }
        Ok(map)
    }

    /// Number of rows in a table, optionally filtered
    pub async fn get_table_row_count(
        &self,
        schema: &str,
        table: &str,
        where_clause: Option<&str>,
    ) -> DbResult<i64> {
        let sql = self.dialect().row_count_query(schema, table, where_clause);
        log::debug!("Counting rows: {}", sql);
        self.querier.query_count(&sql).await
    }
}

fn normalize_row(row: RawSchemaRow, dialect: Dialect) -> DatabaseSchemaRow {
    let ordinal_position = i16::try_from(row.ordinal_position).ok();
    if ordinal_position.is_none() {
        log::warn!(
            "Ordinal position {} of {}.{}.{} is out of range",
            row.ordinal_position,
            row.table_schema,
            row.table_name,
            row.column_name
        );
    }

    let identity_generation = match row.identity_generation {
        Some(syntax) if !syntax.is_empty() => Some(syntax),
        _ if row.is_identity => Some(dialect.default_identity().to_string()),
        _ => None,
    };

    DatabaseSchemaRow {
        info: ColumnInfo {
            ordinal_position,
            is_nullable: !row.is_nullable.eq_ignore_ascii_case("NO"),
            data_type: row.data_type,
            column_default: row.column_default,
            character_maximum_length: row.character_maximum_length,
            numeric_precision: row.numeric_precision.map(i32::from),
            numeric_scale: row.numeric_scale.map(i32::from),
            identity_generation,
            generated_type: row.generation_expression,
        },
        table_schema: row.table_schema,
        table_name: row.table_name,
        column_name: row.column_name,
    }
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod tests;
