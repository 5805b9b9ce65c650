//! Split command: sort a raw CSV and cut it into reference and current

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{OutputFormat, PipelineConfig, SplitArgs};
use crate::dataset::{read_csv, write_csv, Column, Dataset};

/// Row order of `data` sorted by `column` (stable; `NaN` last).
pub(super) fn sorted_order(data: &Dataset, column: &str) -> Result<Vec<usize>, String> {
    let col = data
        .column(column)
        .ok_or_else(|| format!("Column '{column}' not found; available: {}", data.column_names().join(", ")))?;
    let mut order: Vec<usize> = (0..data.n_rows()).collect();
    match col {
        Column::Numeric(v) => order.sort_by(|&a, &b| match (v[a].is_nan(), v[b].is_nan()) {
            (false, false) => v[a].total_cmp(&v[b]),
            (a_nan, b_nan) => a_nan.cmp(&b_nan),
        }),
        Column::Text(v) => order.sort_by(|&a, &b| v[a].cmp(&v[b])),
    }
    Ok(order)
}

/// Cut sorted rows so the first `ratio` share becomes the reference.
pub(super) fn split_sorted(data: &Dataset, order: &[usize], ratio: f64) -> (Dataset, Dataset) {
    let cut = ((order.len() as f64 * ratio).round() as usize).min(order.len());
    (data.take_rows(&order[..cut]), data.take_rows(&order[cut..]))
}

pub fn run_split(
    config: &PipelineConfig,
    args: &SplitArgs,
    format: OutputFormat,
    level: LogLevel,
) -> Result<(), String> {
    if !(args.ratio > 0.0 && args.ratio < 1.0) {
        return Err(format!("Invalid split ratio: {} (must be in (0.0, 1.0))", args.ratio));
    }
    let raw = read_csv(&args.input).map_err(super::describe)?;
    let order = sorted_order(&raw, &args.sort_by)?;
    let (reference, current) = split_sorted(&raw, &order, args.ratio);
    if reference.is_empty() || current.is_empty() {
        return Err(format!("{} has too few rows to split", args.input.display()));
    }

    let reference_path = config.data.dir.join(&config.data.reference);
    let current_path = config.data.dir.join(&config.data.current);
    write_csv(&reference_path, &reference).map_err(super::describe)?;
    write_csv(&current_path, &current).map_err(super::describe)?;

    match format {
        OutputFormat::Json => super::print_json(&serde_json::json!({
            "reference": { "path": reference_path, "rows": reference.n_rows() },
            "current": { "path": current_path, "rows": current.n_rows() },
        })),
        OutputFormat::Text => {
            log(
                level,
                LogLevel::Normal,
                &format!("Reference: {} ({} rows)", reference_path.display(), reference.n_rows()),
            );
            log(
                level,
                LogLevel::Normal,
                &format!("Current: {} ({} rows)", current_path.display(), current.n_rows()),
            );
            Ok(())
        }
    }
}
