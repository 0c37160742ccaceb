use super::*;
use crate::DbError;

fn fk_row(
    table: &str,
    columns: &str,
    nullability: &str,
    referenced_table: Option<&str>,
    referenced_columns: Option<&str>,
) -> RawConstraintRow {
    RawConstraintRow {
        schema_name: "public".to_string(),
        table_name: table.to_string(),
        constraint_name: format!("fk_{table}"),
        constraint_type: "FOREIGN KEY".to_string(),
        constraint_columns: columns.to_string(),
        constraint_columns_nullability: nullability.to_string(),
        referenced_table: referenced_table.map(str::to_string),
        referenced_columns: referenced_columns.map(str::to_string),
    }
}

fn key_row(table: &str, kind: &str, columns: &str) -> RawConstraintRow {
    RawConstraintRow {
        schema_name: "public".to_string(),
        table_name: table.to_string(),
        constraint_name: format!("{table}_key"),
        constraint_type: kind.to_string(),
        constraint_columns: columns.to_string(),
        constraint_columns_nullability: String::new(),
        referenced_table: None,
        referenced_columns: None,
    }
}

#[test]
fn test_split_and_strip() {
    assert_eq!(split_and_strip("a, b,  c"), vec!["a", "b", "c"]);
    assert_eq!(split_and_strip(" , a,,"), vec!["a"]);
    assert!(split_and_strip("").is_empty());
}

#[test]
fn test_build_foreign_keys() {
    let rows = vec![fk_row(
        "orders",
        "user_id, account_id",
        "NOT NULL, NULL",
        Some("public.users"),
        Some("id, account_id"),
    )];
    let constraints = build_table_constraints(&rows).unwrap();
    let fks = &constraints.foreign_keys["public.orders"];
    assert_eq!(fks.len(), 1);
    assert_eq!(fks[0].columns, vec!["user_id", "account_id"]);
    assert_eq!(fks[0].not_nullable, vec![true, false]);
    assert_eq!(fks[0].foreign_key.table, "public.users");
    assert_eq!(fks[0].foreign_key.columns, vec!["id", "account_id"]);
}

#[test]
fn test_foreign_key_without_reference_is_skipped() {
    let rows = vec![
        fk_row("orders", "user_id", "NULL", None, Some("id")),
        fk_row("orders", "user_id", "NULL", Some("public.users"), None),
    ];
    let constraints = build_table_constraints(&rows).unwrap();
    assert!(constraints.foreign_keys.is_empty());
}

#[test]
fn test_foreign_key_with_blank_referenced_table_is_skipped() {
    let rows = vec![
        fk_row("orders", "account_id", "NULL", Some(""), Some("id")),
        fk_row("orders", "account_id", "NULL", Some("  "), Some("id")),
        fk_row("orders", "user_id", "NOT NULL", Some("public.users"), Some("id")),
    ];
    let constraints = build_table_constraints(&rows).unwrap();
    let fks = &constraints.foreign_keys["public.orders"];
    assert_eq!(fks.len(), 1);
    assert_eq!(fks[0].foreign_key.table, "public.users");
}

#[test]
fn test_referenced_column_count_mismatch_is_fatal() {
    let rows = vec![fk_row(
        "orders",
        "user_id, account_id",
        "NULL, NULL",
        Some("public.users"),
        Some("id"),
    )];
    let err = build_table_constraints(&rows).unwrap_err();
    assert!(matches!(
        err,
        DbError::Core(CoreError::ForeignKeyColumnMismatch {
            columns: 2,
            other: 1,
            ..
        })
    ));
    assert!(err.to_string().contains("fk_orders"), "{err}");
}

#[test]
fn test_nullability_count_mismatch_is_fatal() {
    let rows = vec![fk_row("orders", "user_id", "", Some("public.users"), Some("id"))];
    let err = build_table_constraints(&rows).unwrap_err();
    assert!(err.to_string().contains("nullability flags"), "{err}");
}

#[test]
fn test_primary_and_unique_keys_are_deduplicated() {
    let rows = vec![
        key_row("users", "PRIMARY KEY", "id, id"),
        key_row("users", "PRIMARY KEY", "tenant_id, id"),
        key_row("users", "UNIQUE", "email, email"),
        key_row("users", "UNIQUE", "username"),
        key_row("users", "CHECK", "age"),
    ];
    let constraints = build_table_constraints(&rows).unwrap();
    assert_eq!(constraints.primary_keys["public.users"], vec!["id", "tenant_id"]);
    assert_eq!(
        constraints.unique_constraints["public.users"],
        vec![vec!["email".to_string()], vec!["username".to_string()]]
    );
    assert!(constraints.foreign_keys.is_empty());
}

#[test]
fn test_empty_rows() {
    assert!(build_table_constraints(&[]).unwrap().is_empty());
}
