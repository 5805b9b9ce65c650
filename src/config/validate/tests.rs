//! Unit tests for configuration validation

use super::error::ValidationError;
use super::validator::validate_config;
use crate::config::schema::*;

#[test]
fn test_default_config_is_valid() {
    assert!(validate_config(&PipelineConfig::default()).is_ok());
}

#[test]
fn test_zero_threshold() {
    let mut config = PipelineConfig::default();
    config.drift.threshold = 0.0;
    assert_eq!(validate_config(&config), Err(ValidationError::InvalidThreshold(0.0)));
}

#[test]
fn test_threshold_one_is_valid() {
    let mut config = PipelineConfig::default();
    config.drift.threshold = 1.0;
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_nan_threshold() {
    let mut config = PipelineConfig::default();
    config.drift.threshold = f64::NAN;
    assert!(matches!(validate_config(&config), Err(ValidationError::InvalidThreshold(_))));
}

#[test]
fn test_blend_out_of_range() {
    let mut config = PipelineConfig::default();
    config.retrain.blend_max = 1.5;
    assert_eq!(validate_config(&config), Err(ValidationError::InvalidBlendRange(0.4, 1.5)));
}

#[test]
fn test_fixed_blend_fraction_is_valid() {
    let mut config = PipelineConfig::default();
    config.retrain.blend_min = 0.5;
    config.retrain.blend_max = 0.5;
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_zero_max_iterations() {
    let mut config = PipelineConfig::default();
    config.retrain.max_iterations = 0;
    assert_eq!(validate_config(&config), Err(ValidationError::InvalidMaxIterations(0)));
}

#[test]
fn test_bands_out_of_order() {
    let mut config = PipelineConfig::default();
    config.timeline.warning = 0.3;
    config.timeline.critical = 0.2;
    assert_eq!(validate_config(&config), Err(ValidationError::InvalidBands(0.3, 0.2)));
}

#[test]
fn test_zero_frame_duration() {
    let mut config = PipelineConfig::default();
    config.timeline.frame_duration_ms = 0;
    assert_eq!(validate_config(&config), Err(ValidationError::InvalidFrameDuration(0)));
}

#[test]
fn test_frame_duration_upper_bound() {
    let mut config = PipelineConfig::default();
    config.timeline.frame_duration_ms = 655_350;
    assert!(validate_config(&config).is_ok());

    config.timeline.frame_duration_ms = 655_351;
    assert_eq!(validate_config(&config), Err(ValidationError::InvalidFrameDuration(655_351)));

    config.timeline.frame_duration_ms = u32::MAX;
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_command_trainer_needs_program() {
    let mut config = PipelineConfig::default();
    config.trainer.kind = TrainerKind::Command;
    assert_eq!(validate_config(&config), Err(ValidationError::MissingTrainerProgram));

    config.trainer.program = Some("python".to_string());
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_same_reference_and_current() {
    let mut config = PipelineConfig::default();
    config.data.current = config.data.reference.clone();
    assert_eq!(validate_config(&config), Err(ValidationError::InvalidDatasetNames));
}

#[test]
fn test_image_too_small() {
    let mut config = PipelineConfig::default();
    config.report.width = 50;
    assert_eq!(validate_config(&config), Err(ValidationError::InvalidImageSize(50, 700)));
}

#[test]
fn test_error_messages() {
    let err = ValidationError::InvalidThreshold(1.5);
    assert!(err.to_string().contains("1.5"));
    assert!(ValidationError::MissingTrainerProgram.to_string().contains("trainer.program"));
}
