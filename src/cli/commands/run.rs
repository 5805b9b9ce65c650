//! Interactive pipeline: evaluate, then ask what to do about drift

use std::io::{BufRead, Write};

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{OutputFormat, PipelineConfig};
use crate::eval::retrain::Decision;

const PROMPT: &str = "Approve retraining? (y/n/a)";

pub fn run_pipeline<R: BufRead>(
    config: &PipelineConfig,
    format: OutputFormat,
    level: LogLevel,
    input: &mut R,
) -> Result<(), String> {
    let mut orchestrator = super::orchestrator(config);
    let summary = orchestrator.evaluate().map_err(super::describe)?;
    super::print_summary(&summary, config, format, level)?;

    if !summary.needs_action(config.drift.threshold) {
        log(level, LogLevel::Normal, "No retraining needed.");
        return Ok(());
    }

    match ask(input)? {
        Decision::Approve => {
            let attempt = orchestrator.approve_once().map_err(super::describe)?;
            match format {
                OutputFormat::Json => super::print_json(&attempt),
                OutputFormat::Text => {
                    log(
                        level,
                        LogLevel::Normal,
                        &format!(
                            "Retrain #{}: drift {:.1}% -> {:.1}%",
                            attempt.iteration,
                            attempt.drift_before.drift_ratio() * 100.0,
                            attempt.drift_after.drift_ratio() * 100.0
                        ),
                    );
                    Ok(())
                }
            }
        }
        Decision::Reject => {
            let outcome = orchestrator.reject();
            log(level, LogLevel::Normal, &outcome.message);
            Ok(())
        }
        Decision::Auto => super::retrain::auto_resolve(&mut orchestrator, config, format, level),
    }
}

/// Prompt until a valid answer is read. End of input counts as a rejection.
fn ask<R: BufRead>(input: &mut R) -> Result<Decision, String> {
    loop {
        eprint!("{PROMPT} ");
        std::io::stderr().flush().map_err(|e| e.to_string())?;

        let mut line = String::new();
        let read = input.read_line(&mut line).map_err(|e| format!("Failed to read answer: {e}"))?;
        if read == 0 {
            return Ok(Decision::Reject);
        }
        match line.parse::<Decision>() {
            Ok(decision) => return Ok(decision),
            Err(e) => eprintln!("{e}"),
        }
    }
}
