//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use mf_core::JobConfig;
use mf_db::SnapshotQuerier;
use mf_plan::{MapDefinitionSource, PlanCompiler};
use std::fmt;
use std::path::Path;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that destructors run before the process exits.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

pub(crate) type SnapshotCompiler = PlanCompiler<SnapshotQuerier, MapDefinitionSource>;

/// Load the job named by `--job`, a file or a directory holding `maskflow.yml`
pub(crate) fn load_job(global: &GlobalArgs) -> Result<JobConfig> {
    let path = Path::new(&global.job);
    let job = if path.is_dir() {
        JobConfig::load_from_dir(path)
    } else {
        JobConfig::load(path)
    };
    job.with_context(|| format!("Failed to load job from {}", path.display()))
}

/// Build a compiler over the `--snapshot` metadata and the job's own
/// transformer definitions
pub(crate) async fn load_compiler(global: &GlobalArgs, job: &JobConfig) -> Result<SnapshotCompiler> {
    let path = Path::new(&global.snapshot);
    let querier = SnapshotQuerier::load(path)
        .await
        .with_context(|| format!("Failed to load metadata snapshot {}", path.display()))?;
    log::debug!(
        "Loaded {} metadata snapshot from {}",
        querier.snapshot().dialect,
        path.display()
    );
    Ok(PlanCompiler::new(
        querier,
        MapDefinitionSource::new(job.transformers.clone()),
    ))
}

/// `--run-id`, or a fresh random id
pub(crate) fn run_id(global: &GlobalArgs) -> String {
    global
        .run_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(job: &str) -> GlobalArgs {
        GlobalArgs {
            verbose: false,
            job: job.to_string(),
            snapshot: "metadata.json".to_string(),
            run_id: None,
        }
    }

    #[test]
    fn test_load_job_from_dir_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("maskflow.yml");
        std::fs::write(&file, "job_id: j\nmappings: []\n").unwrap();

        let from_dir = load_job(&global(dir.path().to_str().unwrap())).unwrap();
        assert_eq!(from_dir.job_id, "j");
        let from_file = load_job(&global(file.to_str().unwrap())).unwrap();
        assert_eq!(from_file.job_id, "j");
    }

    #[test]
    fn test_load_job_missing_file_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yml");
        let err = load_job(&global(missing.to_str().unwrap())).unwrap_err();
        assert!(err.to_string().starts_with("Failed to load job from"));
    }

    #[test]
    fn test_run_id_defaults_to_uuid() {
        let mut args = global("maskflow.yml");
        assert_eq!(run_id(&args).len(), 36);
        args.run_id = Some("run-7".to_string());
        assert_eq!(run_id(&args), "run-7");
    }
}
