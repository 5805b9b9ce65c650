//! Type definitions for drift evaluation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Statistical test used for one column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftTest {
    /// Two-sample Kolmogorov-Smirnov test (continuous columns)
    KolmogorovSmirnov,
    /// Chi-square test on category frequencies (categorical columns)
    ChiSquare,
    /// Result supplied by an external evaluator
    External,
}

impl DriftTest {
    /// Get the name of this test
    pub fn name(&self) -> &'static str {
        match self {
            DriftTest::KolmogorovSmirnov => "Kolmogorov-Smirnov",
            DriftTest::ChiSquare => "Chi-Square",
            DriftTest::External => "external",
        }
    }
}

/// Drift verdict for a single column
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnDrift {
    /// Whether drift was detected
    pub drifted: bool,
    /// Test score (p-value for the built-in tests)
    pub score: f64,
    /// Test used
    pub test: DriftTest,
}

impl ColumnDrift {
    pub fn new(drifted: bool, score: f64, test: DriftTest) -> Self {
        Self { drifted, score, test }
    }
}

/// Dataset-level drift summary.
///
/// Recomputed on every evaluation; the persisted drift report is the
/// durable copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftSummary {
    /// Number of columns compared
    pub total_columns: usize,
    /// Number of columns flagged as drifted
    pub drifted_columns: usize,
    /// Dataset-level drift flag
    pub dataset_drift: bool,
    /// Per-column verdicts, keyed by column name
    #[serde(default)]
    pub per_column: BTreeMap<String, ColumnDrift>,
}

impl DriftSummary {
    /// Summary from per-column verdicts; dataset drift is flagged when the
    /// drifted share reaches `dataset_drift_share`.
    pub fn from_columns(per_column: BTreeMap<String, ColumnDrift>, dataset_drift_share: f64) -> Self {
        let total_columns = per_column.len();
        let drifted_columns = per_column.values().filter(|c| c.drifted).count();
        let mut summary =
            Self { total_columns, drifted_columns, dataset_drift: false, per_column };
        summary.dataset_drift = total_columns > 0 && summary.drift_ratio() >= dataset_drift_share;
        summary
    }

    /// Summary from counts only, for evaluators without per-column detail.
    pub fn from_counts(total_columns: usize, drifted_columns: usize, dataset_drift: bool) -> Self {
        Self {
            total_columns,
            drifted_columns: drifted_columns.min(total_columns),
            dataset_drift,
            per_column: BTreeMap::new(),
        }
    }

    /// Fraction of compared columns that drifted; 0 when nothing was compared.
    pub fn drift_ratio(&self) -> f64 {
        if self.total_columns == 0 {
            0.0
        } else {
            self.drifted_columns as f64 / self.total_columns as f64
        }
    }

    /// Whether any column drifted
    pub fn has_drift(&self) -> bool {
        self.drifted_columns > 0
    }

    /// Whether the ratio calls for retraining (`ratio >= threshold`).
    pub fn needs_action(&self, threshold: f64) -> bool {
        self.drift_ratio() >= threshold
    }

    /// Names of drifted columns, sorted.
    pub fn drifted_column_names(&self) -> Vec<&str> {
        self.per_column
            .iter()
            .filter(|(_, c)| c.drifted)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Severity band of a drift ratio
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Below the warning band
    Low,
    /// Between warning and critical
    Medium,
    /// At or above critical
    High,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        }
    }

    /// RGB colour used for overlays and charts.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Severity::Low => (0x28, 0xa7, 0x45),
            Severity::Medium => (0xfc, 0xc4, 0x19),
            Severity::High => (0xdc, 0x35, 0x45),
        }
    }
}

/// Ratio boundaries for severity colouring.
///
/// Independent of the action threshold: the bands only drive presentation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeverityBands {
    /// Ratios at or above this are `Medium`
    pub warning: f64,
    /// Ratios at or above this are `High`
    pub critical: f64,
}

impl Default for SeverityBands {
    fn default() -> Self {
        Self { warning: 0.10, critical: 0.25 }
    }
}

impl SeverityBands {
    pub fn classify(&self, ratio: f64) -> Severity {
        if ratio >= self.critical {
            Severity::High
        } else if ratio >= self.warning {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// `(from, to, severity)` spans covering `[0, 1]`.
    pub fn segments(&self) -> [(f64, f64, Severity); 3] {
        [
            (0.0, self.warning, Severity::Low),
            (self.warning, self.critical, Severity::Medium),
            (self.critical, 1.0, Severity::High),
        ]
    }
}
