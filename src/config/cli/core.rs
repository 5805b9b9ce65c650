//! Core CLI types - Cli, Command, and argument structs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::types::OutputFormat;
use crate::config::schema::PipelineConfig;

/// driftloop: drift monitoring with a human-in-the-loop retrain cycle
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "driftloop")]
#[command(version)]
#[command(about = "Detect data drift, then blend, retrain and re-check until it is resolved")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to YAML configuration file (defaults apply when missing)
    #[arg(short, long, global = true, default_value = "driftloop.yaml")]
    pub config: PathBuf,

    /// Override the drift action threshold
    #[arg(long, global = true)]
    pub threshold: Option<f64>,

    /// Seed the random source for reproducible runs
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the last persisted drift report
    Status,

    /// Compare reference and current data and write the drift report
    Evaluate,

    /// Run one blend + retrain + re-evaluate cycle
    Approve,

    /// Retrain until drift falls below the threshold
    AutoResolve(AutoResolveArgs),

    /// Rebuild a drifted reference from current data (demo)
    Reset,

    /// Decline retraining
    Reject,

    /// Evaluate and ask whether to retrain
    Run(RunArgs),

    /// Split a raw CSV into reference and current files
    Split(SplitArgs),
}

/// Arguments for the auto-resolve command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct AutoResolveArgs {
    /// Maximum retrain attempts
    #[arg(long)]
    pub max_iterations: Option<usize>,
}

/// Arguments for the run command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct RunArgs {
    /// Maximum retrain attempts if auto-resolve is chosen
    #[arg(long)]
    pub max_iterations: Option<usize>,
}

/// Arguments for the split command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct SplitArgs {
    /// Raw CSV file
    #[arg(value_name = "RAW")]
    pub input: PathBuf,

    /// Column to sort by before splitting
    #[arg(long)]
    pub sort_by: String,

    /// Share of rows written to the reference file
    #[arg(long, default_value = "0.7")]
    pub ratio: f64,
}

/// Parse CLI arguments
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Apply command-line overrides to a PipelineConfig
pub fn apply_overrides(config: &mut PipelineConfig, cli: &Cli) {
    if let Some(threshold) = cli.threshold {
        config.drift.threshold = threshold;
    }
    if let Some(seed) = cli.seed {
        config.retrain.seed = Some(seed);
    }
    let max_iterations = match &cli.command {
        Command::AutoResolve(args) => args.max_iterations,
        Command::Run(args) => args.max_iterations,
        _ => None,
    };
    if let Some(n) = max_iterations {
        config.retrain.max_iterations = n;
    }
}
