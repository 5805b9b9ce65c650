//! Drift evaluator trait and the built-in statistical implementation.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use super::statistical::{
    category_counts, chi_square_two_sample, ks_statistic, ks_two_sample_p_value,
};
use super::types::{ColumnDrift, DriftSummary, DriftTest};
use crate::dataset::{Column, Dataset};
use crate::error::{Error, Result};

/// Computes a drift summary from two datasets with identical column sets.
///
/// Implementations may be in-process or wrap an external tool; `timeout`
/// bounds the call where the implementation can enforce it.
pub trait DriftEvaluator {
    fn evaluate(
        &self,
        reference: &Dataset,
        current: &Dataset,
        timeout: Option<Duration>,
    ) -> Result<DriftSummary>;

    /// Evaluator name for logs
    fn name(&self) -> &str {
        "external"
    }
}

/// Settings for [`StatisticalDriftEvaluator`]
#[derive(Clone, Debug, PartialEq)]
pub struct StatisticalDriftConfig {
    /// Column drifts when the test p-value falls below this
    pub p_value: f64,
    /// Numeric columns with at most this many distinct reference values are
    /// tested as categorical
    pub categorical_max_unique: usize,
    /// Dataset drift when the drifted share reaches this
    pub dataset_drift_share: f64,
    /// Columns left out of the comparison (e.g. the label)
    pub excluded_columns: Vec<String>,
}

impl Default for StatisticalDriftConfig {
    fn default() -> Self {
        Self {
            p_value: 0.05,
            categorical_max_unique: 5,
            dataset_drift_share: 0.5,
            excluded_columns: Vec::new(),
        }
    }
}

/// Per-column KS / chi-square drift tests
#[derive(Clone, Debug, Default)]
pub struct StatisticalDriftEvaluator {
    config: StatisticalDriftConfig,
}

impl StatisticalDriftEvaluator {
    pub fn new(config: StatisticalDriftConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StatisticalDriftConfig {
        &self.config
    }

    /// Test one column pair.
    pub fn test_column(&self, reference: &Column, current: &Column) -> ColumnDrift {
        match (reference, current) {
            (Column::Numeric(r), Column::Numeric(c))
                if reference.distinct_count() > self.config.categorical_max_unique =>
            {
                let d = ks_statistic(r, c);
                let n1 = r.iter().filter(|x| !x.is_nan()).count();
                let n2 = c.iter().filter(|x| !x.is_nan()).count();
                let p = ks_two_sample_p_value(d, n1, n2);
                ColumnDrift::new(p < self.config.p_value, p, DriftTest::KolmogorovSmirnov)
            }
            _ => {
                let r = reference.text_cells();
                let c = current.text_cells();
                let baseline = category_counts(r.iter().map(String::as_str));
                let observed = category_counts(c.iter().map(String::as_str));
                let (_, p) = chi_square_two_sample(&baseline, &observed);
                ColumnDrift::new(p < self.config.p_value, p, DriftTest::ChiSquare)
            }
        }
    }
}

impl DriftEvaluator for StatisticalDriftEvaluator {
    fn evaluate(
        &self,
        reference: &Dataset,
        current: &Dataset,
        timeout: Option<Duration>,
    ) -> Result<DriftSummary> {
        let started = Instant::now();
        let mut per_column = BTreeMap::new();

        for (name, ref_col) in reference.columns() {
            if self.config.excluded_columns.iter().any(|c| c == name) {
                continue;
            }
            let cur_col = current
                .column(name)
                .ok_or_else(|| Error::evaluation(format!("column '{name}' missing from current")))?;
            per_column.insert(name.to_string(), self.test_column(ref_col, cur_col));

            if let Some(limit) = timeout {
                if started.elapsed() > limit {
                    return Err(Error::evaluation(format!(
                        "drift evaluation exceeded timeout of {limit:?}"
                    )));
                }
            }
        }

        Ok(DriftSummary::from_columns(per_column, self.config.dataset_drift_share))
    }

    fn name(&self) -> &str {
        "statistical"
    }
}
