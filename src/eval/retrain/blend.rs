//! Reference blending: partial replacement of reference rows with current rows.

use rand::seq::index;
use rand::Rng;
use tracing::debug;

use crate::dataset::Dataset;
use crate::error::{Error, Result};

/// Replaces a fraction of reference rows with rows sampled from current.
pub struct ReferenceBlender;

impl ReferenceBlender {
    /// Number of rows a blend of `fraction` replaces in a table of `n_rows`.
    pub fn rows_to_replace(n_rows: usize, fraction: f64) -> usize {
        let f = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        ((n_rows as f64 * f).round() as usize).min(n_rows)
    }

    /// Overwrite `round(N * fraction)` distinct reference rows, each with an
    /// independently drawn current row.
    ///
    /// Target positions are chosen without replacement, source rows with
    /// replacement. Row count and column order of `reference` are preserved.
    /// Returns the number of rows replaced.
    pub fn blend<R: Rng + ?Sized>(
        reference: &mut Dataset,
        current: &Dataset,
        fraction: f64,
        rng: &mut R,
    ) -> Result<usize> {
        let n = reference.n_rows();
        let k = Self::rows_to_replace(n, fraction);
        if k == 0 {
            return Ok(0);
        }
        if current.is_empty() {
            return Err(Error::evaluation("cannot blend from an empty current dataset"));
        }

        let current = current.aligned_to(reference)?;
        let m = current.n_rows();
        let targets = index::sample(rng, n, k);
        for dst in targets.into_iter() {
            let src = rng.random_range(0..m);
            reference.copy_row_from(dst, &current, src);
        }

        debug!(rows = k, of = n, fraction, "blended reference rows");
        Ok(k)
    }
}
