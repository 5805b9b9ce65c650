//! YAML schema for the pipeline configuration
//!
//! Every section is optional; missing keys take the defaults below.
//!
//! ```yaml
//! data:
//!   dir: data
//!   label_column: Churn
//! drift:
//!   threshold: 0.25
//! retrain:
//!   max_iterations: 10
//!   seed: 42
//! trainer:
//!   kind: command
//!   program: python
//!   args: ["train.py", "--data", "{data}", "--output", "{model}"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::eval::drift::SeverityBands;

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub data: DataConfig,
    pub drift: DriftConfig,
    pub retrain: RetrainConfig,
    pub trainer: TrainerConfig,
    pub report: ReportConfig,
    pub timeline: TimelineConfig,
}

/// Dataset locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding the reference and current CSV files
    pub dir: PathBuf,
    /// Reference file name inside `dir`
    pub reference: String,
    /// Current file name inside `dir`
    pub current: String,
    /// Target column; never perturbed by the demo injector
    pub label_column: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            reference: "reference.csv".to_string(),
            current: "current.csv".to_string(),
            label_column: "Churn".to_string(),
        }
    }
}

/// Drift decision settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// Drift ratio at or above which retraining is needed
    pub threshold: f64,
    /// Per-column significance level
    pub p_value: f64,
    /// Numeric columns with at most this many distinct values are categorical
    pub categorical_max_unique: usize,
    /// Drifted share that flags dataset-level drift
    pub dataset_drift_share: f64,
    /// Leave the label column out of the comparison
    pub exclude_label: bool,
    /// Evaluation time budget
    pub timeout_secs: Option<u64>,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            threshold: 0.25,
            p_value: 0.05,
            categorical_max_unique: 5,
            dataset_drift_share: 0.5,
            exclude_label: false,
            timeout_secs: None,
        }
    }
}

impl DriftConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Retrain loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrainConfig {
    /// Approve attempts allowed per auto-resolve run
    pub max_iterations: usize,
    /// Lower bound of the blend fraction
    pub blend_min: f64,
    /// Upper bound of the blend fraction
    pub blend_max: f64,
    /// Rows kept by the demo reset
    pub demo_rows: usize,
    /// RNG seed; unseeded runs draw from the OS
    pub seed: Option<u64>,
}

impl Default for RetrainConfig {
    fn default() -> Self {
        Self { max_iterations: 10, blend_min: 0.4, blend_max: 0.6, demo_rows: 500, seed: None }
    }
}

/// Training backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainerKind {
    /// Nearest-centroid classifier
    #[default]
    Builtin,
    /// External program
    Command,
}

/// Trainer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub kind: TrainerKind,
    /// Program run by the command trainer
    pub program: Option<String>,
    /// Argument template (`{data}`, `{model}`, `{label}`)
    pub args: Vec<String>,
    /// Final model location
    pub model_path: PathBuf,
    /// Training time budget
    pub timeout_secs: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            kind: TrainerKind::Builtin,
            program: None,
            args: Vec::new(),
            model_path: PathBuf::from("models/model.json"),
            timeout_secs: None,
        }
    }
}

impl TrainerConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Report output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory for the drift report, dashboard and timeline
    pub dir: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Font used for overlays; system fonts are tried when unset
    pub font_path: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from("reports"), width: 1000, height: 700, font_path: None }
    }
}

/// Progress timeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub frame_duration_ms: u32,
    /// Severity band boundaries (independent of `drift.threshold`)
    pub warning: f64,
    pub critical: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self { frame_duration_ms: 2000, warning: 0.10, critical: 0.25 }
    }
}

impl TimelineConfig {
    pub fn bands(&self) -> SeverityBands {
        SeverityBands { warning: self.warning, critical: self.critical }
    }
}

impl PipelineConfig {
    /// Path of the persisted drift report
    pub fn report_path(&self) -> PathBuf {
        self.report.dir.join("drift_report.json")
    }

    /// Path of the assembled timeline GIF
    pub fn timeline_path(&self) -> PathBuf {
        self.report.dir.join("retrain_progress.gif")
    }

    /// Directory for transient frame files
    pub fn frame_dir(&self) -> PathBuf {
        self.report.dir.join("frames")
    }
}
