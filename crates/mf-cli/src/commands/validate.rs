//! Validate command implementation

use anyhow::{Context, Result};
use mf_core::drift::{missing_columns, unmapped_columns};
use mf_core::{find_circular_dependencies, group_mappings_by_table};
use mf_db::DbError;
use mf_plan::PlanError;

use crate::cli::{GlobalArgs, ValidateArgs};
use crate::commands::common::{load_compiler, load_job, ExitCode};

/// Execute the validate command
pub async fn execute(args: &ValidateArgs, global: &GlobalArgs) -> Result<()> {
    let job = load_job(global)?;
    let compiler = load_compiler(global, &job).await?;

    println!("Validating job: {}\n", job.job_id);

    let schema = compiler
        .manager()
        .get_schema_column_map()
        .await
        .context("Failed to load schema metadata")?;

    let mut errors = 0;
    let mut warnings = 0;

    for column in missing_columns(&schema, &job.mappings) {
        println!("[ERROR] C003: mapped column {column} does not exist in the source");
        errors += 1;
    }

    let halt = job.halt_on_new_column || args.strict;
    for column in unmapped_columns(&schema, &job.mappings) {
        if halt {
            println!("[ERROR] C004: column {column} is not mapped");
            errors += 1;
        } else {
            println!("[WARNING] C004: column {column} is not mapped and will be copied verbatim");
            warnings += 1;
        }
    }

    // ordering problems only make sense once the mappings match the schema
    if errors == 0 {
        let mut relaxed = job.clone();
        relaxed.halt_on_new_column = false;
        match compiler.resolve(&relaxed).await {
            Ok(runs) => {
                log::debug!("{} run(s) resolved", runs.len());
                let constraints = compiler
                    .manager()
                    .get_table_constraints_by_schema(&job.effective_schemas())
                    .await
                    .context("Failed to load constraints")?;
                let mapped = group_mappings_by_table(&job.mappings);
                let cycles = find_circular_dependencies(
                    mapped.keys().filter(|t| schema.contains_key(*t)),
                    &constraints.foreign_keys,
                );
                for group in cycles {
                    let names: Vec<&str> = group.iter().map(|t| t.as_str()).collect();
                    println!("[INFO] circular references: {}", names.join(", "));
                }
            }
            Err(PlanError::Core(err)) | Err(PlanError::Db(DbError::Core(err))) => {
                println!("[ERROR] {err}");
                errors += 1;
            }
            Err(err) => return Err(err).context("Failed to resolve table order"),
        }
    }

    let tables = group_mappings_by_table(&job.mappings).len();
    println!(
        "\n{} table(s), {} mapping(s): {} error(s), {} warning(s)",
        tables,
        job.mappings.len(),
        errors,
        warnings
    );

    if errors > 0 {
        return Err(ExitCode(1).into());
    }
    Ok(())
}
