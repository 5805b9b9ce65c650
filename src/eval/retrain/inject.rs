//! Synthetic drift for demos.

use rand::Rng;
use tracing::debug;

use crate::dataset::{Column, Dataset};

/// Default number of rows kept by [`DemoDriftInjector::inject`].
pub const DEFAULT_DEMO_ROWS: usize = 500;

/// Perturbs numeric columns so a fresh reference drifts away from current.
pub struct DemoDriftInjector;

impl DemoDriftInjector {
    /// Copy of `current` with every numeric non-label column mapped through
    /// `x * scale + shift`, truncated to the first `rows_limit` rows.
    ///
    /// `scale ~ U(0.5, 1.5)` and `shift ~ U(-10, 10)` are drawn once per
    /// column.
    pub fn inject<R: Rng + ?Sized>(
        current: &Dataset,
        label: &str,
        rows_limit: usize,
        rng: &mut R,
    ) -> Dataset {
        let mut out = current.clone();
        for name in current.numeric_column_names() {
            if name == label {
                continue;
            }
            let scale = rng.random_range(0.5..1.5);
            let shift = rng.random_range(-10.0..10.0);
            if let Some(Column::Numeric(values)) = out.column_mut(&name) {
                for x in values.iter_mut() {
                    *x = *x * scale + shift;
                }
            }
            debug!(column = %name, scale, shift, "injected drift");
        }
        out.truncate(rows_limit);
        out
    }
}
