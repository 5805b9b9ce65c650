//! Statistical helper functions for drift evaluation.

use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Two-sample Kolmogorov-Smirnov statistic (max ECDF distance).
///
/// `NaN` values are ignored. Returns 0 when either side is empty.
pub fn ks_statistic(a: &[f64], b: &[f64]) -> f64 {
    let mut a: Vec<f64> = a.iter().copied().filter(|x| !x.is_nan()).collect();
    let mut b: Vec<f64> = b.iter().copied().filter(|x| !x.is_nan()).collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    a.sort_by(|x, y| x.partial_cmp(y).unwrap_or(Ordering::Equal));
    b.sort_by(|x, y| x.partial_cmp(y).unwrap_or(Ordering::Equal));

    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let (mut i, mut j) = (0usize, 0usize);
    let mut d_max = 0.0f64;

    // Advance past every copy of the smallest pending value so ties move
    // both ECDFs together.
    while i < a.len() && j < b.len() {
        let x = a[i].min(b[j]);
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }
        d_max = d_max.max((i as f64 / n1 - j as f64 / n2).abs());
    }
    d_max
}

/// Asymptotic two-sample KS p-value for statistic `d` and sample sizes.
pub fn ks_two_sample_p_value(d: f64, n1: usize, n2: usize) -> f64 {
    if n1 == 0 || n2 == 0 {
        return 1.0;
    }
    let (n1, n2) = (n1 as f64, n2 as f64);
    let n_eff = (n1 * n2) / (n1 + n2);
    ks_p_value(d * n_eff.sqrt())
}

/// Approximate p-value for KS statistic using Kolmogorov distribution
pub fn ks_p_value(lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return 1.0;
    }
    // Asymptotic approximation: P(D > d) ≈ 2 * sum_{k=1}^∞ (-1)^{k+1} * exp(-2 * k^2 * λ^2)
    let mut p = 0.0;
    for k in 1..=100 {
        let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
        let term = sign * (-2.0 * f64::from(k).powi(2) * lambda.powi(2)).exp();
        p += term;
        if term.abs() < 1e-10 {
            break;
        }
    }
    (2.0 * p).clamp(0.0, 1.0)
}

/// Frequency of each distinct value.
pub fn category_counts<'a>(values: impl IntoIterator<Item = &'a str>) -> BTreeMap<&'a str, usize> {
    let mut counts = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}

/// Chi-square homogeneity test of two frequency tables.
///
/// Returns `(statistic, p_value)`; expected counts come from the pooled
/// proportions, degrees of freedom = categories - 1.
pub fn chi_square_two_sample(
    baseline: &BTreeMap<&str, usize>,
    current: &BTreeMap<&str, usize>,
) -> (f64, f64) {
    let total_baseline: f64 = baseline.values().sum::<usize>() as f64;
    let total_current: f64 = current.values().sum::<usize>() as f64;
    if total_baseline == 0.0 || total_current == 0.0 {
        return (0.0, 1.0);
    }

    let mut categories: Vec<&str> = baseline.keys().chain(current.keys()).copied().collect();
    categories.sort_unstable();
    categories.dedup();

    let total = total_baseline + total_current;
    let mut chi_sq = 0.0;
    for cat in &categories {
        let b = *baseline.get(cat).unwrap_or(&0) as f64;
        let c = *current.get(cat).unwrap_or(&0) as f64;
        let pooled = (b + c) / total;
        let expected_b = pooled * total_baseline;
        let expected_c = pooled * total_current;
        if expected_b > 0.0 {
            chi_sq += (b - expected_b).powi(2) / expected_b;
        }
        if expected_c > 0.0 {
            chi_sq += (c - expected_c).powi(2) / expected_c;
        }
    }

    let df = categories.len().saturating_sub(1);
    (chi_sq, chi_square_p_value(chi_sq, df))
}

/// Approximate chi-square p-value using Wilson-Hilferty approximation
pub fn chi_square_p_value(chi_sq: f64, df: usize) -> f64 {
    if df == 0 || chi_sq <= 0.0 {
        return 1.0;
    }
    let k = df as f64;
    // Wilson-Hilferty transformation to normal
    let z = ((chi_sq / k).powf(1.0 / 3.0) - (1.0 - 2.0 / (9.0 * k))) / (2.0 / (9.0 * k)).sqrt();
    // Convert z to p-value (upper tail)
    0.5 * (1.0 - erf(z / std::f64::consts::SQRT_2))
}

/// Error function approximation
pub fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x >= 0.0 { 1.0 } else { -1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    sign * y
}

/// Arithmetic mean ignoring `NaN`; `None` when no values remain.
pub fn mean(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|x| !x.is_nan()).collect();
    if finite.is_empty() {
        None
    } else {
        Some(finite.iter().sum::<f64>() / finite.len() as f64)
    }
}
