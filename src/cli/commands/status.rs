//! Status command: read-only view of the persisted drift report

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{OutputFormat, PipelineConfig};
use crate::eval::drift::DriftReport;

pub fn run_status(config: &PipelineConfig, format: OutputFormat, level: LogLevel) -> Result<(), String> {
    let path = config.report_path();
    if !path.exists() {
        return Err(format!(
            "No drift report at {}\n  → Run `driftloop evaluate` first",
            path.display()
        ));
    }
    let report = DriftReport::load(&path).map_err(super::describe)?;

    match format {
        OutputFormat::Json => super::print_json(&report),
        OutputFormat::Text => {
            log(
                level,
                LogLevel::Normal,
                &format!("Report: {} ({})", path.display(), report.generated_at.to_rfc3339()),
            );
            for line in super::summary_lines(&report.summary, report.threshold, &config.timeline.bands()) {
                log(level, LogLevel::Normal, &line);
            }
            let timeline = config.timeline_path();
            if timeline.exists() {
                log(level, LogLevel::Verbose, &format!("Timeline: {}", timeline.display()));
            }
            Ok(())
        }
    }
}
