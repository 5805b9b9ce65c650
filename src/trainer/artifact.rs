//! Model artifact handle.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Handle to a persisted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Final model path
    pub path: PathBuf,
    /// Number of training rows
    pub rows: usize,
    /// Completion time
    pub trained_at: DateTime<Utc>,
    /// Backend that produced the model
    pub trainer: String,
    /// Accuracy on the training data, when the backend reports it
    pub training_accuracy: Option<f64>,
}

impl ModelArtifact {
    pub fn new(path: impl Into<PathBuf>, rows: usize, trainer: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            rows,
            trained_at: Utc::now(),
            trainer: trainer.into(),
            training_accuracy: None,
        }
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.training_accuracy = Some(accuracy);
        self
    }
}

/// `<model>.tmp` next to the final model path.
pub fn temp_path_for(model_path: &Path) -> PathBuf {
    let mut name = model_path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    model_path.with_file_name(name)
}
