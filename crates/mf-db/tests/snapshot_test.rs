//! Integration tests for the snapshot-backed metadata adapter

use mf_db::{DbError, Dialect, MetadataQuerier, SnapshotQuerier, SqlManager};

const SNAPSHOT: &str = r#"{
  "dialect": "postgres",
  "schema_rows": [
    { "table_schema": "public", "table_name": "users", "column_name": "id",
      "data_type": "int4", "is_nullable": "NO", "ordinal_position": 1, "is_identity": true },
    { "table_schema": "public", "table_name": "users", "column_name": "email",
      "data_type": "varchar", "ordinal_position": 2, "character_maximum_length": 40 },
    { "table_schema": "public", "table_name": "users", "column_name": "manager_id",
      "data_type": "int4", "ordinal_position": 3 },
    { "table_schema": "audit", "table_name": "events", "column_name": "id",
      "data_type": "int4", "is_nullable": "NO", "ordinal_position": 1 }
  ],
  "constraint_rows": [
    { "schema_name": "public", "table_name": "users", "constraint_name": "users_pkey",
      "constraint_type": "PRIMARY KEY", "constraint_columns": "id" },
    { "schema_name": "public", "table_name": "users", "constraint_name": "users_manager_fk",
      "constraint_type": "FOREIGN KEY", "constraint_columns": "manager_id",
      "constraint_columns_nullability": "NULL",
      "referenced_table": "public.users", "referenced_columns": "id" },
    { "schema_name": "audit", "table_name": "events", "constraint_name": "events_pkey",
      "constraint_type": "PRIMARY KEY", "constraint_columns": "id" }
  ],
  "row_counts": {
    "SELECT COUNT(*) FROM \"public\".\"users\" WHERE id > 10": 7
  }
}"#;

#[tokio::test]
async fn test_snapshot_round_trip_through_manager() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    std::fs::write(&path, SNAPSHOT).unwrap();

    let manager = SqlManager::new(SnapshotQuerier::load(&path).await.unwrap());
    assert_eq!(manager.dialect(), Dialect::Postgres);

    let columns = manager.get_schema_column_map().await.unwrap();
    let users = &columns["public.users"];
    assert_eq!(users.len(), 3);
    assert_eq!(
        users["id"].identity_generation.as_deref(),
        Some("BY DEFAULT")
    );
    assert!(users["manager_id"].is_nullable);
    assert_eq!(users["email"].character_maximum_length, Some(40));

    let constraints = manager
        .get_table_constraints_by_schema(&["public".to_string()])
        .await
        .unwrap();
    assert_eq!(constraints.primary_keys_for("public.users"), ["id".to_string()]);
    assert!(!constraints.primary_keys.contains_key("audit.events"));
    assert_eq!(constraints.foreign_keys["public.users"][0].not_nullable, vec![false]);

    assert!(manager.get_role_permissions_map().await.unwrap().is_empty());

    let count = manager
        .get_table_row_count("public", "users", Some("id > 10"))
        .await
        .unwrap();
    assert_eq!(count, 7);
    assert!(matches!(
        manager.get_table_row_count("public", "users", None).await,
        Err(DbError::ExecutionError(_))
    ));
}

#[tokio::test]
async fn test_snapshot_with_no_rows() {
    let querier = SnapshotQuerier::from_json(r#"{ "dialect": "mysql" }"#).unwrap();
    assert!(matches!(querier.database_schema().await, Err(DbError::NoRows)));

    let manager = SqlManager::new(querier);
    assert!(manager.get_schema_column_map().await.unwrap().is_empty());
    assert!(manager
        .get_table_constraints_by_schema(&["app".to_string()])
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_invalid_snapshot() {
    let err = SnapshotQuerier::from_json(r#"{ "dialect": "oracle" }"#).unwrap_err();
    assert!(matches!(err, DbError::SnapshotError { .. }));

    let dir = tempfile::tempdir().unwrap();
    let err = SnapshotQuerier::load(&dir.path().join("missing.json"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("missing.json"), "{err}");
}
