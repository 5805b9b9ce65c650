//! Validation error types

/// Validation error type
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid drift threshold: {0} (must be > 0.0 and <= 1.0)")]
    InvalidThreshold(f64),

    #[error("Invalid p-value: {0} (must be in (0.0, 1.0))")]
    InvalidPValue(f64),

    #[error("Invalid dataset drift share: {0} (must be in (0.0, 1.0])")]
    InvalidDriftShare(f64),

    #[error("Invalid blend range: [{0}, {1}] (bounds must be in [0.0, 1.0] with min <= max)")]
    InvalidBlendRange(f64, f64),

    #[error("Invalid max iterations: {0} (must be > 0)")]
    InvalidMaxIterations(usize),

    #[error("Invalid demo rows: {0} (must be > 0)")]
    InvalidDemoRows(usize),

    #[error("Invalid severity bands: warning {0}, critical {1} (need 0.0 <= warning <= critical <= 1.0)")]
    InvalidBands(f64, f64),

    #[error("Invalid frame duration: {0}ms (must be between 1 and 655350)")]
    InvalidFrameDuration(u32),

    #[error("Invalid image size: {0}x{1} (each side must be >= 200)")]
    InvalidImageSize(u32, u32),

    #[error("Command trainer requires `trainer.program`")]
    MissingTrainerProgram,

    #[error("Dataset names must be non-empty and distinct")]
    InvalidDatasetNames,

    #[error("Label column cannot be empty")]
    EmptyLabelColumn,
}
