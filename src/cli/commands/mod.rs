//! CLI command implementations

mod evaluate;
mod retrain;
mod run;
mod split;
mod status;


use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{
    apply_overrides, load_config, validate_config, Cli, Command, OutputFormat, PipelineConfig,
};
use crate::eval::drift::{DriftSummary, SeverityBands};
use crate::eval::retrain::RetrainOrchestrator;

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let level = LogLevel::from_flags(cli.quiet, cli.verbose);

    let mut config = load_config(&cli.config).map_err(describe)?;
    apply_overrides(&mut config, &cli);
    validate_config(&config).map_err(|e| format!("Invalid option: {e}"))?;
    let format = cli.format;

    match cli.command {
        Command::Status => status::run_status(&config, format, level),
        Command::Evaluate => evaluate::run_evaluate(&config, format, level),
        Command::Approve => retrain::run_approve(&config, format, level),
        Command::AutoResolve(_) => retrain::run_auto_resolve(&config, format, level),
        Command::Reset => retrain::run_reset(&config, format, level),
        Command::Reject => retrain::run_reject(&config, format, level),
        Command::Run(_) => {
            let stdin = std::io::stdin();
            run::run_pipeline(&config, format, level, &mut stdin.lock())
        }
        Command::Split(args) => split::run_split(&config, &args, format, level),
    }
}

/// Console message for a library error, tagged with its code. Failures the
/// user cannot fix by changing inputs get a pointer to the verbose log.
fn describe(err: crate::Error) -> String {
    let mut message = format!("[{}] {err}", err.code());
    if !err.is_user_error() {
        message.push_str("\n  → Re-run with --verbose for details");
    }
    message
}

fn orchestrator(config: &PipelineConfig) -> RetrainOrchestrator {
    RetrainOrchestrator::from_pipeline_config(config)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization error: {e}"))?;
    println!("{json}");
    Ok(())
}

/// Human-readable drift summary lines.
fn summary_lines(summary: &DriftSummary, threshold: f64, bands: &SeverityBands) -> Vec<String> {
    let ratio = summary.drift_ratio();
    let mut lines = vec![
        format!(
            "Drift: {}/{} columns ({:.1}%) [{}]",
            summary.drifted_columns,
            summary.total_columns,
            ratio * 100.0,
            bands.classify(ratio).label()
        ),
        format!(
            "Action needed: {} (threshold {:.1}%)",
            if summary.needs_action(threshold) { "yes" } else { "no" },
            threshold * 100.0
        ),
    ];
    let drifted = summary.drifted_column_names();
    if !drifted.is_empty() {
        lines.push(format!("Drifted columns: {}", drifted.join(", ")));
    }
    lines
}

fn print_summary(
    summary: &DriftSummary,
    config: &PipelineConfig,
    format: OutputFormat,
    level: LogLevel,
) -> Result<(), String> {
    match format {
        OutputFormat::Json => print_json(summary),
        OutputFormat::Text => {
            for line in summary_lines(summary, config.drift.threshold, &config.timeline.bands()) {
                log(level, LogLevel::Normal, &line);
            }
            Ok(())
        }
    }
}
