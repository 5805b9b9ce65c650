//! driftloop CLI
//!
//! # Usage
//!
//! ```bash
//! # Evaluate drift and write the report and dashboard
//! driftloop evaluate
//!
//! # Evaluate, then prompt for a retraining decision
//! driftloop run -c driftloop.yaml
//!
//! # Retrain until drift resolves
//! driftloop auto-resolve --max-iterations 5
//!
//! # Show the last report
//! driftloop status --format json
//! ```

use std::process::ExitCode;

use clap::Parser;
use driftloop::cli::{run_command, Cli, LogLevel};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = LogLevel::from_flags(cli.quiet, cli.verbose);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level.tracing_level())
        .with_target(false)
        .init();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
