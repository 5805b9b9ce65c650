//! Approve, auto-resolve, reset and reject commands

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{OutputFormat, PipelineConfig};
use crate::eval::retrain::{AutoResolveResult, RetrainAttempt, RetrainOrchestrator};

pub fn run_approve(config: &PipelineConfig, format: OutputFormat, level: LogLevel) -> Result<(), String> {
    let mut orchestrator = super::orchestrator(config);
    orchestrator.evaluate().map_err(super::describe)?;
    let attempt = orchestrator.approve_once().map_err(super::describe)?;

    match format {
        OutputFormat::Json => super::print_json(&attempt),
        OutputFormat::Text => {
            print_attempt(&attempt, level);
            Ok(())
        }
    }
}

pub fn run_auto_resolve(
    config: &PipelineConfig,
    format: OutputFormat,
    level: LogLevel,
) -> Result<(), String> {
    let mut orchestrator = super::orchestrator(config);
    auto_resolve(&mut orchestrator, config, format, level)
}

/// Run the loop and report; non-converged outcomes become an error.
pub(super) fn auto_resolve(
    orchestrator: &mut RetrainOrchestrator,
    config: &PipelineConfig,
    format: OutputFormat,
    level: LogLevel,
) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Auto-resolving (max {} iterations)...", config.retrain.max_iterations),
    );
    let result = orchestrator.auto_resolve(config.retrain.max_iterations);

    match format {
        OutputFormat::Json => super::print_json(&result)?,
        OutputFormat::Text => print_result(&result, level),
    }

    if result.success() {
        Ok(())
    } else {
        Err(result.message())
    }
}

pub fn run_reset(config: &PipelineConfig, format: OutputFormat, level: LogLevel) -> Result<(), String> {
    let mut orchestrator = super::orchestrator(config);
    let outcome = orchestrator.reset_demo();

    if format == OutputFormat::Json {
        super::print_json(&outcome)?;
    } else {
        log(level, LogLevel::Normal, &outcome.message);
    }
    if outcome.success {
        Ok(())
    } else {
        Err(outcome.message)
    }
}

pub fn run_reject(config: &PipelineConfig, format: OutputFormat, level: LogLevel) -> Result<(), String> {
    let outcome = super::orchestrator(config).reject();
    match format {
        OutputFormat::Json => super::print_json(&outcome),
        OutputFormat::Text => {
            log(level, LogLevel::Normal, &outcome.message);
            Ok(())
        }
    }
}

fn print_attempt(attempt: &RetrainAttempt, level: LogLevel) {
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Retrain #{}: replaced {} rows ({:.0}%), drift {:.1}% -> {:.1}%{}",
            attempt.iteration,
            attempt.rows_replaced,
            attempt.rows_replaced_fraction * 100.0,
            attempt.drift_before.drift_ratio() * 100.0,
            attempt.drift_after.drift_ratio() * 100.0,
            if attempt.succeeded { " (resolved)" } else { "" }
        ),
    );
    log(level, LogLevel::Verbose, &format!("  Model: {}", attempt.model.path.display()));
    if let Some(accuracy) = attempt.model.training_accuracy {
        log(level, LogLevel::Verbose, &format!("  Training accuracy: {:.1}%", accuracy * 100.0));
    }
}

fn print_result(result: &AutoResolveResult, level: LogLevel) {
    for attempt in &result.attempts {
        print_attempt(attempt, level);
    }
    log(level, LogLevel::Normal, &result.message());
    if let Some(path) = &result.timeline {
        log(level, LogLevel::Normal, &format!("Timeline: {}", path.display()));
    }
}
