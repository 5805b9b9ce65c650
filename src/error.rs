//! Error types for the drift retraining loop.
//!
//! Errors from the core decision path (evaluate, approve, auto-resolve) are
//! always surfaced; cosmetic failures (fonts, missing visualizations) are
//! logged and degraded by the callers instead of producing an `Error`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for driftloop operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while evaluating drift or running the retrain loop.
#[derive(Error, Debug)]
pub enum Error {
    /// Dataset missing, empty or schema-mismatched, or the evaluator failed.
    #[error("Drift evaluation failed: {message}")]
    Evaluation { message: String },

    /// External trainer failed. Not retried.
    #[error("Training failed: {message}")]
    Training { message: String },

    /// Operation invoked out of order (e.g. approve before any evaluation).
    #[error("Invalid state: {message}\n  → Run `driftloop evaluate` first")]
    State { message: String },

    /// Artifact read/write failure.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed tabular data.
    #[error("Dataset error in {path}: {message}")]
    Dataset { path: PathBuf, message: String },

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON/YAML (de)serialization failure.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Image rendering failure.
    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::Evaluation { message: message.into() }
    }

    pub fn training(message: impl Into<String>) -> Self {
        Self::Training { message: message.into() }
    }

    pub fn state(message: impl Into<String>) -> Self {
        Self::State { message: message.into() }
    }

    /// Whether the user can fix this without a code change.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Evaluation { .. } | Self::State { .. } | Self::Dataset { .. } | Self::Config(_)
        )
    }

    /// Error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Evaluation { .. } => "E001",
            Self::Training { .. } => "E002",
            Self::State { .. } => "E003",
            Self::Io { .. } => "E010",
            Self::Dataset { .. } => "E011",
            Self::Config(_) => "E020",
            Self::Serialization { .. } => "E021",
            Self::Render(_) => "E030",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization { message: e.to_string() }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Serialization { message: e.to_string() }
    }
}
