//! End-to-end compilation against a recorded metadata snapshot

use mf_core::{CoreError, JobConfig, JobMapping, RunType, Transformer};
use mf_db::SnapshotQuerier;
use mf_plan::{MapDefinitionSource, PlanCompiler, PlanError, ProcessorConfig};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// `users.manager_id` points back at `users`, `orders.buyer_id` at `users`.
const SNAPSHOT: &str = r#"{
  "dialect": "postgres",
  "schema_rows": [
    { "table_schema": "public", "table_name": "users", "column_name": "id",
      "data_type": "int4", "is_nullable": "NO", "ordinal_position": 1 },
    { "table_schema": "public", "table_name": "users", "column_name": "name",
      "data_type": "varchar", "ordinal_position": 2 },
    { "table_schema": "public", "table_name": "users", "column_name": "email",
      "data_type": "varchar", "ordinal_position": 3, "character_maximum_length": 40 },
    { "table_schema": "public", "table_name": "users", "column_name": "manager_id",
      "data_type": "int4", "ordinal_position": 4 },
    { "table_schema": "public", "table_name": "orders", "column_name": "id",
      "data_type": "int4", "is_nullable": "NO", "ordinal_position": 1 },
    { "table_schema": "public", "table_name": "orders", "column_name": "buyer_id",
      "data_type": "int4", "is_nullable": "NO", "ordinal_position": 2 },
    { "table_schema": "public", "table_name": "orders", "column_name": "note",
      "data_type": "text", "ordinal_position": 3 }
  ],
  "constraint_rows": [
    { "schema_name": "public", "table_name": "users", "constraint_name": "users_pkey",
      "constraint_type": "PRIMARY KEY", "constraint_columns": "id" },
    { "schema_name": "public", "table_name": "users", "constraint_name": "users_manager_fk",
      "constraint_type": "FOREIGN KEY", "constraint_columns": "manager_id",
      "constraint_columns_nullability": "NULL",
      "referenced_table": "public.users", "referenced_columns": "id" },
    { "schema_name": "public", "table_name": "orders", "constraint_name": "orders_pkey",
      "constraint_type": "PRIMARY KEY", "constraint_columns": "id" },
    { "schema_name": "public", "table_name": "orders", "constraint_name": "orders_buyer_fk",
      "constraint_type": "FOREIGN KEY", "constraint_columns": "buyer_id",
      "constraint_columns_nullability": "NOT NULL",
      "referenced_table": "public.users", "referenced_columns": "id" }
  ]
}"#;

const JOB: &str = r#"
job_id: job-1
schemas: [public]
cache:
  url: redis://localhost:6379
mappings:
  - { schema: public, table: users, column: id, transformer: { source: passthrough } }
  - { schema: public, table: users, column: name, transformer: { source: transform_first_name, config: { preserve_length: true } } }
  - { schema: public, table: users, column: email, transformer: { source: user_defined, config: { id: "123" } } }
  - { schema: public, table: users, column: manager_id, transformer: { source: passthrough } }
  - { schema: public, table: orders, column: id, transformer: { source: passthrough } }
  - { schema: public, table: orders, column: buyer_id, transformer: { source: passthrough } }
  - { schema: public, table: orders, column: note, transformer: { source: generate_null } }
transformers:
  "123": { source: transform_email, config: { preserve_domain: true } }
"#;

fn compiler(job: &JobConfig) -> PlanCompiler<SnapshotQuerier, MapDefinitionSource> {
    PlanCompiler::new(
        SnapshotQuerier::from_json(SNAPSHOT).unwrap(),
        MapDefinitionSource::new(job.transformers.clone()),
    )
}

#[tokio::test]
async fn test_compile_self_referencing_job() {
    let job = JobConfig::parse(JOB).unwrap();
    let plan = compiler(&job).compile(&job, "run-1").await.unwrap();

    assert_eq!(plan.job_id, "job-1");
    assert_eq!(
        plan.run_order(),
        vec![
            "public.users.insert",
            "public.users.update",
            "public.orders.insert"
        ]
    );

    let users_insert = plan.find("public.users.insert").unwrap();
    assert!(users_insert.run_config.split_columns);
    assert_eq!(
        users_insert.run_config.insert_columns,
        vec!["id", "name", "email"]
    );
    assert_eq!(users_insert.processors.len(), 2);
    assert!(matches!(users_insert.processors[0], ProcessorConfig::Branch(_)));
    assert_eq!(
        users_insert.processors[1],
        ProcessorConfig::Mutation(
            [
                r#"root."name" = transform_first_name(value:this."name",preserve_length:true)"#,
                r#"root."email" = transform_email(value:this."email",preserve_domain:true,preserve_length:false,excluded_domains:[],max_length:40,email_type:"uuidv4",invalid_email_action:"reject")"#,
            ]
            .join("\n")
        )
    );

    let users_update = plan.find("public.users.update").unwrap();
    assert_eq!(users_update.run_config.run_type, RunType::Update);
    assert_eq!(users_update.run_config.insert_columns, vec!["manager_id"]);
    assert!(users_update.processors.is_empty());

    let orders = plan.find("public.orders.insert").unwrap();
    assert!(!orders.run_config.split_columns);
    assert_eq!(
        orders.processors,
        vec![ProcessorConfig::Mutation(r#"root."note" = null"#.to_string())]
    );
}

#[tokio::test]
async fn test_plan_serializes_to_json() {
    let job = JobConfig::parse(JOB).unwrap();
    let plan = compiler(&job).compile(&job, "run-1").await.unwrap();

    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["run_id"], "run-1");
    assert_eq!(json["tables"][0]["run_config"]["run_type"], "insert");
    assert!(json["tables"][0]["processors"][0]["branch"]["cache"]["url"]
        .as_str()
        .unwrap()
        .starts_with("redis://"));
}

#[tokio::test]
async fn test_missing_cache_is_fatal_for_bridged_keys() {
    let yaml = JOB.replace("cache:\n  url: redis://localhost:6379\n", "");
    let job = JobConfig::parse(&yaml).unwrap();
    let err = compiler(&job).compile(&job, "run-1").await.unwrap_err();
    assert!(matches!(err, PlanError::MissingCacheConfig { .. }), "{err}");
}

#[tokio::test]
async fn test_stale_mapping_halts() {
    let mut job = JobConfig::parse(JOB).unwrap();
    job.mappings.push(JobMapping::new(
        "public",
        "users",
        "nickname",
        Transformer::GenerateNull,
    ));

    let err = compiler(&job).compile(&job, "run-1").await.unwrap_err();
    assert!(
        matches!(err, PlanError::Core(CoreError::SchemaDrift { ref columns }) if columns.contains("nickname")),
        "{err}"
    );
}

#[tokio::test]
async fn test_unmapped_column_respects_halt_flag() {
    let mut job = JobConfig::parse(JOB).unwrap();
    job.mappings.retain(|m| m.column != "note");

    let err = compiler(&job).compile(&job, "run-1").await.unwrap_err();
    assert!(matches!(err, PlanError::Core(CoreError::UnmappedColumns { .. })), "{err}");

    job.halt_on_new_column = false;
    let plan = compiler(&job).compile(&job, "run-1").await.unwrap();
    let orders = plan.find("public.orders.insert").unwrap();
    assert!(orders.processors.is_empty());
    assert_eq!(
        orders.run_config.insert_columns,
        vec!["id", "buyer_id", "note"]
    );
}

#[tokio::test]
async fn test_resolve_only_orders_runs() {
    let job = JobConfig::parse(JOB).unwrap();
    let runs = compiler(&job).resolve(&job).await.unwrap();
    let ids: Vec<String> = runs.iter().map(|r| r.id()).collect();
    assert_eq!(
        ids,
        vec![
            "public.users.insert",
            "public.users.update",
            "public.orders.insert"
        ]
    );
}

#[tokio::test]
async fn test_cancelled_compilation_returns_no_plan() {
    let job = JobConfig::parse(JOB).unwrap();
    let cancel = Arc::new(AtomicBool::new(true));
    let err = compiler(&job)
        .with_cancellation(cancel)
        .compile(&job, "run-1")
        .await
        .unwrap_err();
    assert!(matches!(err, PlanError::Cancelled));
}
