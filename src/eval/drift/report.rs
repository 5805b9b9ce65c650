//! Persisted drift report.
//!
//! The JSON file is the durable source of truth read by `status` and any
//! external dashboard; the orchestrator itself never re-reads it.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{DriftSummary, Severity, SeverityBands};
use crate::error::{Error, Result};

/// Drift summary plus the decision context it was judged against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    /// When the evaluation ran
    pub generated_at: DateTime<Utc>,
    /// Action threshold in effect
    pub threshold: f64,
    /// `drifted_columns / total_columns`
    pub drift_ratio: f64,
    /// Whether the ratio reached the threshold
    pub needs_action: bool,
    /// Severity band of the ratio
    pub severity: Severity,
    /// Full summary
    pub summary: DriftSummary,
}

impl DriftReport {
    pub fn new(summary: DriftSummary, threshold: f64, bands: &SeverityBands) -> Self {
        let drift_ratio = summary.drift_ratio();
        Self {
            generated_at: Utc::now(),
            threshold,
            drift_ratio,
            needs_action: summary.needs_action(threshold),
            severity: bands.classify(drift_ratio),
            summary,
        }
    }

    /// Write the report as pretty JSON, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::io(format!("creating {}", parent.display()), e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .map_err(|e| Error::io(format!("writing drift report {}", path.display()), e))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("reading drift report {}", path.display()), e))?;
        Ok(serde_json::from_str(&content)?)
    }
}
