//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Maskflow - compile anonymizing database sync plans
#[derive(Parser, Debug)]
#[command(name = "mf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Job file, or a directory containing maskflow.yml
    #[arg(short, long, global = true, default_value = "maskflow.yml")]
    pub job: String,

    /// Metadata snapshot of the source database (JSON)
    #[arg(short, long, global = true, default_value = "metadata.json")]
    pub snapshot: String,

    /// Run identifier used in cache keys (default: random UUID)
    #[arg(long, global = true, env = "MASKFLOW_RUN_ID")]
    pub run_id: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile the job into a sync plan
    Plan(PlanArgs),

    /// Check the job's mappings against the live schema
    Validate(ValidateArgs),

    /// Show the order tables are written in
    Order(OrderArgs),
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub output: PlanOutput,

    /// Write the plan to a file instead of stdout
    #[arg(long)]
    pub out: Option<String>,
}

/// Plan output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutput {
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Treat unmapped columns as errors even when the job allows them
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the order command
#[derive(Args, Debug)]
pub struct OrderArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OrderOutput,

    /// Include source row counts (subset filters applied)
    #[arg(long)]
    pub counts: bool,
}

/// Order output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
