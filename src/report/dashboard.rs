//! Static drift dashboard rendered with plotters.

use std::path::{Path, PathBuf};
use std::time::Duration;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::{debug, info};

use super::font::{ensure_font, FONT_FAMILY};
use super::visual::{render_err, VisualArtifact};
use super::Reporter;
use crate::dataset::{Column, Dataset};
use crate::error::{Error, Result};
use crate::eval::drift::{DriftSummary, SeverityBands};

/// Dashboard image name inside the report directory
pub const VISUALIZATION_FILE: &str = "drift_visualizations.png";
/// Text summary name inside the report directory
pub const SUMMARY_FILE: &str = "drift_summary.txt";

/// Distribution panels drawn for drifted columns at most
pub const MAX_DRIFTED_PANELS: usize = 12;
/// Panels drawn when no plottable column drifted
pub const FALLBACK_PANELS: usize = 3;
/// Columns whose standard deviation is at or below this on either side are not plotted
pub const MIN_SPREAD: f64 = 0.01;

const PANELS_PER_ROW: usize = 3;
const HISTOGRAM_BINS: usize = 20;

const DRIFT_RED: RGBColor = RGBColor(0xff, 0x6b, 0x6b);
const STABLE_GREEN: RGBColor = RGBColor(0x51, 0xcf, 0x66);
const TOTAL_BLUE: RGBColor = RGBColor(0x4d, 0xab, 0xf7);
const REFERENCE_BLUE: RGBColor = RGBColor(0x33, 0x9a, 0xf0);
const CURRENT_PINK: RGBColor = RGBColor(0xf0, 0x65, 0x95);
const TRACK_GREY: RGBColor = RGBColor(0xe9, 0xec, 0xef);
const DRIFT_TEXT: RGBColor = RGBColor(0xdc, 0x35, 0x45);
const STABLE_TEXT: RGBColor = RGBColor(0x28, 0xa7, 0x45);

/// Writes `drift_visualizations.png` and `drift_summary.txt`.
///
/// Layout:
/// - title strip
/// - summary row: drifted/stable split, total/drifted/stable counts, and the
///   drift-share gauge with severity bands and the action threshold marker
/// - per-column `1 - p` bars (drifted in red)
/// - reference vs current histograms, three per row, for the columns chosen
///   by [`PlottersReporter::distribution_columns`]
#[derive(Clone, Debug)]
pub struct PlottersReporter {
    dir: PathBuf,
    width: u32,
    height: u32,
    threshold: f64,
    bands: SeverityBands,
    font_path: Option<PathBuf>,
}

impl PlottersReporter {
    pub fn new(dir: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            dir: dir.into(),
            width,
            height,
            threshold: 0.25,
            bands: SeverityBands::default(),
            font_path: None,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_bands(mut self, bands: SeverityBands) -> Self {
        self.bands = bands;
        self
    }

    pub fn with_font(mut self, path: Option<PathBuf>) -> Self {
        self.font_path = path;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Columns that get a distribution panel.
    ///
    /// Plottable columns are numeric on both sides with a standard deviation
    /// above [`MIN_SPREAD`] on both sides. Drifted plottable columns come
    /// first, capped at [`MAX_DRIFTED_PANELS`]; when there are none the first
    /// [`FALLBACK_PANELS`] plottable columns in reference order are used.
    pub fn distribution_columns(
        &self,
        summary: &DriftSummary,
        reference: &Dataset,
        current: &Dataset,
    ) -> Vec<String> {
        let plottable = |name: &str| {
            let spread = |data: &Dataset| {
                data.column(name).and_then(Column::as_numeric).and_then(std_dev)
            };
            matches!((spread(reference), spread(current)), (Some(a), Some(b)) if a > MIN_SPREAD && b > MIN_SPREAD)
        };

        let drifted: Vec<String> = summary
            .drifted_column_names()
            .into_iter()
            .filter(|name| plottable(*name))
            .take(MAX_DRIFTED_PANELS)
            .map(str::to_string)
            .collect();
        if !drifted.is_empty() {
            return drifted;
        }
        reference
            .column_names()
            .iter()
            .filter(|name| plottable(name.as_str()))
            .take(FALLBACK_PANELS)
            .cloned()
            .collect()
    }

    /// Draw the dashboard into an RGB buffer.
    pub fn draw(
        &self,
        summary: &DriftSummary,
        reference: &Dataset,
        current: &Dataset,
    ) -> Result<VisualArtifact> {
        let text = ensure_font(self.font_path.as_deref());
        let panels = self.distribution_columns(summary, reference, current);
        debug!(panels = panels.len(), "distribution panels selected");

        let mut pixels = vec![0u8; self.width as usize * self.height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut pixels, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;

            let (title, body) = root.split_vertically(60);
            let (_, body_h) = body.dim_in_pixel();
            let (top_row, lower) = body.split_vertically(body_h * 2 / 5);

            if text {
                let ratio = summary.drift_ratio();
                let caption = format!(
                    "Data drift: {}/{} columns ({:.1}%) - {}",
                    summary.drifted_columns,
                    summary.total_columns,
                    ratio * 100.0,
                    self.bands.classify(ratio).label()
                );
                title
                    .draw(&Text::new(caption, (16, 18), (FONT_FAMILY, 26).into_font().color(&BLACK)))
                    .map_err(render_err)?;
            }

            let cells = top_row.split_evenly((1, 3));
            self.draw_split(&cells[0], summary, text)?;
            self.draw_counts(&cells[1], summary, text)?;
            self.draw_gauge(&cells[2], summary)?;

            if panels.is_empty() {
                self.draw_bars(&lower, summary, text)?;
            } else {
                let (lower_w, _) = lower.dim_in_pixel();
                let (bars, distributions) = lower.split_horizontally(lower_w / 3);
                self.draw_bars(&bars, summary, text)?;
                self.draw_distributions(&distributions, &panels, summary, reference, current, text)?;
            }
            root.present().map_err(render_err)?;
        }
        VisualArtifact::from_rgb(self.width, self.height, pixels)
            .ok_or_else(|| Error::Render("dashboard buffer size mismatch".to_string()))
    }

    /// Horizontal drifted / stable split bar.
    fn draw_split<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        summary: &DriftSummary,
        text: bool,
    ) -> Result<()> {
        let (w, h) = area.dim_in_pixel();
        let (left, right) = (16i32, w as i32 - 16);
        let (top, bottom) = (h as i32 * 35 / 100, h as i32 * 65 / 100);
        if right <= left || bottom <= top {
            return Ok(());
        }

        let stable = summary.total_columns.saturating_sub(summary.drifted_columns);
        if summary.total_columns == 0 {
            area.draw(&Rectangle::new([(left, top), (right, bottom)], TRACK_GREY.filled()))
                .map_err(render_err)?;
        } else {
            let cut = left + ((right - left) as f64 * summary.drift_ratio()).round() as i32;
            area.draw(&Rectangle::new([(left, top), (cut, bottom)], DRIFT_RED.filled()))
                .map_err(render_err)?;
            area.draw(&Rectangle::new([(cut, top), (right, bottom)], STABLE_GREEN.filled()))
                .map_err(render_err)?;
        }
        area.draw(&Rectangle::new([(left, top), (right, bottom)], BLACK.stroke_width(1)))
            .map_err(render_err)?;

        if text {
            let label = format!("Drifted {} / Stable {stable}", summary.drifted_columns);
            area.draw(&Text::new(label, (left, 4), (FONT_FAMILY, 14).into_font().color(&BLACK)))
                .map_err(render_err)?;
        }
        Ok(())
    }

    /// Total, drifted and stable column counts as vertical bars.
    fn draw_counts<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        summary: &DriftSummary,
        text: bool,
    ) -> Result<()> {
        let (w, h) = area.dim_in_pixel();
        let (left, right) = (16i32, w as i32 - 16);
        let top = 8i32;
        let bottom = h as i32 - if text { 20 } else { 8 };
        if right - left < 9 || bottom <= top {
            return Ok(());
        }

        let stable = summary.total_columns.saturating_sub(summary.drifted_columns);
        let counts = [
            ("Total", summary.total_columns, TOTAL_BLUE),
            ("Drifted", summary.drifted_columns, DRIFT_RED),
            ("Stable", stable, STABLE_GREEN),
        ];
        let max = summary.total_columns.max(1) as f64;
        let slot = (right - left) / 3;
        for (i, (label, count, color)) in counts.into_iter().enumerate() {
            let x0 = left + slot * i as i32 + slot / 5;
            let x1 = left + slot * (i as i32 + 1) - slot / 5;
            let y0 = bottom - ((bottom - top) as f64 * count as f64 / max).round() as i32;
            area.draw(&Rectangle::new([(x0, y0), (x1, bottom)], color.filled()))
                .map_err(render_err)?;
            area.draw(&Rectangle::new([(x0, y0), (x1, bottom)], BLACK.stroke_width(1)))
                .map_err(render_err)?;
            if text {
                let style = (FONT_FAMILY, 12).into_font().color(&BLACK);
                area.draw(&Text::new(format!("{label} {count}"), (x0, bottom + 4), style))
                    .map_err(render_err)?;
            }
        }
        Ok(())
    }

    fn draw_gauge<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        summary: &DriftSummary,
    ) -> Result<()> {
        let (w, h) = area.dim_in_pixel();
        let (left, right) = (16i32, w as i32 - 16);
        let (top, bottom) = (h as i32 * 3 / 10, h as i32 * 7 / 10);
        if right <= left || bottom - top < 4 {
            return Ok(());
        }
        let x = |r: f64| left + ((right - left) as f64 * r.clamp(0.0, 1.0)).round() as i32;
        let inset = (bottom - top) / 5;

        for (from, to, severity) in self.bands.segments() {
            let (r, g, b) = severity.rgb();
            area.draw(&Rectangle::new([(x(from), top), (x(to), bottom)], RGBColor(r, g, b).mix(0.25).filled()))
                .map_err(render_err)?;
        }

        let ratio = summary.drift_ratio();
        let (r, g, b) = self.bands.classify(ratio).rgb();
        area.draw(&Rectangle::new([(left, top + inset), (x(ratio), bottom - inset)], RGBColor(r, g, b).filled()))
            .map_err(render_err)?;
        area.draw(&Rectangle::new([(left, top), (right, bottom)], BLACK.stroke_width(1)))
            .map_err(render_err)?;

        let t = x(self.threshold);
        area.draw(&PathElement::new(vec![(t, top - inset), (t, bottom + inset)], BLACK.stroke_width(3)))
            .map_err(render_err)
    }

    /// One row per column, bar length `1 - p`.
    fn draw_bars<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        summary: &DriftSummary,
        text: bool,
    ) -> Result<()> {
        if summary.per_column.is_empty() {
            debug!("no per-column detail to plot");
            return Ok(());
        }
        let (w, h) = area.dim_in_pixel();
        let (left, right) = (16i32, w as i32 - 16);
        let (top, bottom) = (8i32, h as i32 - 8);
        if right <= left || bottom <= top {
            return Ok(());
        }
        let row = (bottom - top) as f64 / summary.per_column.len() as f64;
        let labelled = text && row >= 14.0;

        for (i, (name, c)) in summary.per_column.iter().enumerate() {
            let y0 = top + (row * i as f64).round() as i32;
            let y1 = top + (row * (i + 1) as f64).round() as i32;
            let gap = ((y1 - y0) / 6).max(if y1 - y0 > 2 { 1 } else { 0 });
            let len = ((right - left) as f64 * (1.0 - c.score).clamp(0.0, 1.0)).round() as i32;
            let color = if c.drifted { DRIFT_RED } else { TOTAL_BLUE };
            area.draw(&Rectangle::new([(left, y0 + gap), (left + len, y1 - gap)], color.filled()))
                .map_err(render_err)?;
            if labelled {
                let style = (FONT_FAMILY, 12).into_font().color(&BLACK);
                area.draw(&Text::new(name.clone(), (left + 2, y0 + gap), style)).map_err(render_err)?;
            }
        }
        area.draw(&PathElement::new(vec![(left, top), (left, bottom)], BLACK.stroke_width(1)))
            .map_err(render_err)
    }

    /// Overlaid reference / current histograms, three panels per row.
    fn draw_distributions<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        columns: &[String],
        summary: &DriftSummary,
        reference: &Dataset,
        current: &Dataset,
        text: bool,
    ) -> Result<()> {
        let rows = columns.len().div_ceil(PANELS_PER_ROW);
        let panels = area.split_evenly((rows, PANELS_PER_ROW));

        for (panel, name) in panels.iter().zip(columns) {
            fn numeric<'d>(data: &'d Dataset, name: &str) -> Option<&'d [f64]> {
                data.column(name).and_then(Column::as_numeric)
            }
            let (Some(ref_values), Some(cur_values)) = (numeric(reference, name), numeric(current, name)) else {
                continue;
            };
            let drifted = summary.per_column.get(name).is_some_and(|c| c.drifted);

            let (w, h) = panel.dim_in_pixel();
            let pad = 4i32;
            let (left, right) = (pad, w as i32 - pad);
            let (top, bottom) = (if text { 22 } else { pad }, h as i32 - pad);
            if right - left < 4 || bottom - top < 4 {
                continue;
            }

            let Some((lo, hi)) = value_range(ref_values.iter().chain(cur_values)) else {
                continue;
            };
            let ref_bins = histogram(ref_values, lo, hi, HISTOGRAM_BINS);
            let cur_bins = histogram(cur_values, lo, hi, HISTOGRAM_BINS);
            let peak = ref_bins.iter().chain(&cur_bins).copied().fold(0.0, f64::max);
            if peak <= 0.0 {
                continue;
            }

            let bin_w = (right - left) as f64 / HISTOGRAM_BINS as f64;
            for (bins, color) in [(&ref_bins, REFERENCE_BLUE), (&cur_bins, CURRENT_PINK)] {
                for (i, share) in bins.iter().enumerate().filter(|(_, s)| **s > 0.0) {
                    let x0 = left + (i as f64 * bin_w).round() as i32;
                    let x1 = left + ((i + 1) as f64 * bin_w).round() as i32;
                    let y0 = bottom - ((bottom - top) as f64 * share / peak).round() as i32;
                    panel
                        .draw(&Rectangle::new([(x0, y0), (x1, bottom)], color.mix(0.45).filled()))
                        .map_err(render_err)?;
                }
            }

            let (border, width) = if drifted { (DRIFT_RED, 2) } else { (STABLE_GREEN, 1) };
            panel
                .draw(&Rectangle::new([(left, top), (right, bottom)], border.stroke_width(width)))
                .map_err(render_err)?;

            if text {
                let short: String = name.chars().take(15).collect();
                let (status, color) = if drifted { ("DRIFTED", DRIFT_TEXT) } else { ("Stable", STABLE_TEXT) };
                let style = (FONT_FAMILY, 13).into_font().color(&color);
                panel
                    .draw(&Text::new(format!("{short} ({status})"), (pad, 4), style))
                    .map_err(render_err)?;
            }
        }
        Ok(())
    }

    /// Plain-text summary listing the drifted columns.
    pub fn summary_text(&self, summary: &DriftSummary) -> String {
        let ratio = summary.drift_ratio();
        let mut out = String::from("Data Drift Summary\n==================\n");
        out.push_str(&format!(
            "Drifted columns: {}/{} ({:.1}%)\n",
            summary.drifted_columns,
            summary.total_columns,
            ratio * 100.0
        ));
        out.push_str(&format!("Dataset drift: {}\n", if summary.dataset_drift { "yes" } else { "no" }));
        out.push_str(&format!("Severity: {}\n", self.bands.classify(ratio).label()));
        out.push_str(&format!(
            "Action needed: {} (threshold {:.0}%)\n",
            if summary.needs_action(self.threshold) { "yes" } else { "no" },
            self.threshold * 100.0
        ));
        let drifted = summary.drifted_column_names();
        if !drifted.is_empty() {
            out.push_str("\nDrifted:\n");
            for name in drifted {
                let c = &summary.per_column[name];
                out.push_str(&format!("  - {name} ({}, p={:.4})\n", c.test.name(), c.score));
            }
        }
        out
    }
}

impl Reporter for PlottersReporter {
    fn render(
        &self,
        summary: &DriftSummary,
        reference: &Dataset,
        current: &Dataset,
        _timeout: Option<Duration>,
    ) -> Result<VisualArtifact> {
        let visual = self.draw(summary, reference, current)?;
        visual.save_png(&self.dir.join(VISUALIZATION_FILE))?;

        let summary_path = self.dir.join(SUMMARY_FILE);
        std::fs::write(&summary_path, self.summary_text(summary))
            .map_err(|e| Error::io(format!("writing {}", summary_path.display()), e))?;

        info!(dir = %self.dir.display(), "drift report rendered");
        Ok(visual)
    }
}

/// Sample standard deviation of the finite values; `None` below two values.
pub(super) fn std_dev(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() < 2 {
        return None;
    }
    let n = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / n;
    let var = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(var.sqrt())
}

/// Min and max of the finite values, widened when they coincide.
fn value_range<'a>(values: impl Iterator<Item = &'a f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    if lo > hi {
        return None;
    }
    Some(if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) })
}

/// Share of the finite values falling in each of `bins` equal-width bins
/// over `[lo, hi]`; `hi` lands in the last bin.
pub(super) fn histogram(values: &[f64], lo: f64, hi: f64, bins: usize) -> Vec<f64> {
    if bins == 0 || !(hi > lo) {
        return vec![0.0; bins];
    }
    let mut counts = vec![0usize; bins];
    let width = (hi - lo) / bins as f64;
    let mut total = 0usize;
    for v in values.iter().copied().filter(|v| v.is_finite() && *v >= lo && *v <= hi) {
        let i = (((v - lo) / width) as usize).min(bins - 1);
        counts[i] += 1;
        total += 1;
    }
    counts
        .into_iter()
        .map(|c| if total == 0 { 0.0 } else { c as f64 / total as f64 })
        .collect()
}
