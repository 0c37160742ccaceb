//! Plan command implementation

use anyhow::{Context, Result};
use mf_plan::SyncPlan;
use std::path::Path;

use crate::cli::{GlobalArgs, PlanArgs, PlanOutput};
use crate::commands::common::{load_compiler, load_job, run_id};

/// Execute the plan command
pub async fn execute(args: &PlanArgs, global: &GlobalArgs) -> Result<()> {
    let job = load_job(global)?;
    let compiler = load_compiler(global, &job).await?;
    let run_id = run_id(global);

    let plan = compiler
        .compile(&job, &run_id)
        .await
        .with_context(|| format!("Failed to compile job {}", job.job_id))?;

    let rendered = render_plan(&plan, args.output)?;
    match &args.out {
        Some(out) => {
            let path = Path::new(out);
            tokio::fs::write(path, rendered)
                .await
                .with_context(|| format!("Failed to write plan to {}", path.display()))?;
            println!(
                "Wrote plan for job {} ({} runs) to {}",
                plan.job_id,
                plan.tables.len(),
                path.display()
            );
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

fn render_plan(plan: &SyncPlan, output: PlanOutput) -> Result<String> {
    let rendered = match output {
        PlanOutput::Json => {
            let mut json = serde_json::to_string_pretty(plan).context("Failed to serialize plan")?;
            json.push('\n');
            json
        }
        PlanOutput::Yaml => serde_yaml::to_string(plan).context("Failed to serialize plan")?,
    };
    Ok(rendered)
}
