//! Order command implementation

use anyhow::{Context, Result};
use mf_core::RunConfig;
use serde::Serialize;

use crate::cli::{GlobalArgs, OrderArgs, OrderOutput};
use crate::commands::common::{load_compiler, load_job, SnapshotCompiler};

/// One line of the order listing
#[derive(Debug, Serialize)]
struct RunInfo {
    run: String,
    table: String,
    run_type: String,
    columns: Vec<String>,
    depends_on: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    where_clause: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<i64>,
}

/// Execute the order command
pub async fn execute(args: &OrderArgs, global: &GlobalArgs) -> Result<()> {
    let job = load_job(global)?;
    let compiler = load_compiler(global, &job).await?;

    let runs = compiler
        .resolve(&job)
        .await
        .with_context(|| format!("Failed to resolve table order for job {}", job.job_id))?;

    let mut infos = Vec::with_capacity(runs.len());
    for run in &runs {
        let rows = if args.counts {
            Some(row_count(&compiler, run).await?)
        } else {
            None
        };
        infos.push(run_info(run, rows));
    }

    match args.output {
        OrderOutput::Table => print_table(&infos),
        OrderOutput::Json => {
            let json = serde_json::to_string_pretty(&infos).context("Failed to serialize order")?;
            println!("{json}");
        }
    }

    Ok(())
}

async fn row_count(compiler: &SnapshotCompiler, run: &RunConfig) -> Result<i64> {
    let (schema, table) = run
        .table
        .split()
        .with_context(|| format!("Table name {} is not schema-qualified", run.table))?;
    compiler
        .manager()
        .get_table_row_count(schema, table, run.where_clause.as_deref())
        .await
        .with_context(|| format!("Failed to count rows of {}", run.table))
}

fn run_info(run: &RunConfig, rows: Option<i64>) -> RunInfo {
    RunInfo {
        run: run.id(),
        table: run.table.to_string(),
        run_type: run.run_type.to_string(),
        columns: run.insert_columns.clone(),
        depends_on: run
            .depends_on
            .iter()
            .map(|d| format!("{}({})", d.table, d.columns.join(",")))
            .collect(),
        where_clause: run.where_clause.clone(),
        rows,
    }
}

fn print_table(runs: &[RunInfo]) {
    let run_width = runs.iter().map(|r| r.run.len()).max().unwrap_or(3).max(3);
    let type_width = 6;
    let rows_width = if runs.iter().any(|r| r.rows.is_some()) { 8 } else { 0 };

    if rows_width > 0 {
        println!(
            "{:<run_width$}  {:<type_width$}  {:>rows_width$}  DEPENDS_ON",
            "RUN", "TYPE", "ROWS"
        );
    } else {
        println!("{:<run_width$}  {:<type_width$}  DEPENDS_ON", "RUN", "TYPE");
    }
    println!(
        "{}",
        "-".repeat(run_width + type_width + rows_width + if rows_width > 0 { 16 } else { 14 })
    );

    for run in runs {
        let depends_on = if run.depends_on.is_empty() {
            "-".to_string()
        } else {
            run.depends_on.join(", ")
        };
        match run.rows {
            Some(rows) => println!(
                "{:<run_width$}  {:<type_width$}  {:>rows_width$}  {}",
                run.run, run.run_type, rows, depends_on
            ),
            None => println!(
                "{:<run_width$}  {:<type_width$}  {}",
                run.run, run.run_type, depends_on
            ),
        }
    }

    println!("\n{} run(s)", runs.len());
}
