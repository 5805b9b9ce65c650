//! Drift Evaluation Module
//!
//! Compares a reference dataset against a current dataset column by column:
//! - Kolmogorov-Smirnov test (continuous columns)
//! - Chi-square test (categorical and low-cardinality columns)
//!
//! The orchestrator depends only on [`DriftEvaluator`]; the statistical
//! evaluator is the default implementation.

mod evaluator;
mod report;
mod statistical;
mod types;


pub use evaluator::{DriftEvaluator, StatisticalDriftConfig, StatisticalDriftEvaluator};
pub use report::DriftReport;
pub use types::{ColumnDrift, DriftSummary, DriftTest, Severity, SeverityBands};

// Re-export statistical functions for testing/advanced use
pub use statistical::{
    category_counts, chi_square_p_value, chi_square_two_sample, erf, ks_p_value, ks_statistic,
    ks_two_sample_p_value, mean,
};
