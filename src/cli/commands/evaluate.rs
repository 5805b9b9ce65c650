//! Evaluate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{OutputFormat, PipelineConfig};
use crate::report::{SUMMARY_FILE, VISUALIZATION_FILE};

pub fn run_evaluate(
    config: &PipelineConfig,
    format: OutputFormat,
    level: LogLevel,
) -> Result<(), String> {
    let mut orchestrator = super::orchestrator(config);
    let summary = orchestrator.evaluate().map_err(super::describe)?;

    super::print_summary(&summary, config, format, level)?;
    if format == OutputFormat::Text {
        log(level, LogLevel::Verbose, &format!("Report: {}", config.report_path().display()));
        log(
            level,
            LogLevel::Verbose,
            &format!("Dashboard: {}", config.report.dir.join(VISUALIZATION_FILE).display()),
        );
        log(
            level,
            LogLevel::Verbose,
            &format!("Summary: {}", config.report.dir.join(SUMMARY_FILE).display()),
        );
    }
    Ok(())
}
