//! Configuration validation logic

use super::error::ValidationError;
use crate::config::schema::{PipelineConfig, TrainerKind};
use crate::timeline::MAX_FRAME_DURATION_MS;

/// Validate a pipeline configuration
///
/// Checks:
/// - Ratios and probabilities are in range
/// - Blend bounds and severity bands are ordered
/// - The command trainer has a program
pub fn validate_config(config: &PipelineConfig) -> Result<(), ValidationError> {
    let data = &config.data;
    if data.reference.is_empty() || data.current.is_empty() || data.reference == data.current {
        return Err(ValidationError::InvalidDatasetNames);
    }
    if data.label_column.is_empty() {
        return Err(ValidationError::EmptyLabelColumn);
    }

    let drift = &config.drift;
    if !(drift.threshold > 0.0 && drift.threshold <= 1.0) {
        return Err(ValidationError::InvalidThreshold(drift.threshold));
    }
    if !(drift.p_value > 0.0 && drift.p_value < 1.0) {
        return Err(ValidationError::InvalidPValue(drift.p_value));
    }
    if !(drift.dataset_drift_share > 0.0 && drift.dataset_drift_share <= 1.0) {
        return Err(ValidationError::InvalidDriftShare(drift.dataset_drift_share));
    }

    let retrain = &config.retrain;
    let in_unit = |x: f64| (0.0..=1.0).contains(&x);
    if !in_unit(retrain.blend_min) || !in_unit(retrain.blend_max) || retrain.blend_min > retrain.blend_max {
        return Err(ValidationError::InvalidBlendRange(retrain.blend_min, retrain.blend_max));
    }
    if retrain.max_iterations == 0 {
        return Err(ValidationError::InvalidMaxIterations(retrain.max_iterations));
    }
    if retrain.demo_rows == 0 {
        return Err(ValidationError::InvalidDemoRows(retrain.demo_rows));
    }

    let timeline = &config.timeline;
    if !in_unit(timeline.warning) || !in_unit(timeline.critical) || timeline.warning > timeline.critical {
        return Err(ValidationError::InvalidBands(timeline.warning, timeline.critical));
    }
    if timeline.frame_duration_ms == 0 || timeline.frame_duration_ms > MAX_FRAME_DURATION_MS {
        return Err(ValidationError::InvalidFrameDuration(timeline.frame_duration_ms));
    }

    if config.report.width < 200 || config.report.height < 200 {
        return Err(ValidationError::InvalidImageSize(config.report.width, config.report.height));
    }

    if config.trainer.kind == TrainerKind::Command
        && config.trainer.program.as_deref().map_or(true, str::is_empty)
    {
        return Err(ValidationError::MissingTrainerProgram);
    }

    Ok(())
}
