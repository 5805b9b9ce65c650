//! Progress frame annotation.

use std::path::PathBuf;

use plotters::prelude::*;
use tracing::{debug, warn};

use crate::error::Result;
use crate::eval::drift::{DriftSummary, SeverityBands};
use crate::report::font::{ensure_font, FONT_FAMILY};
use crate::report::{render_err, VisualArtifact};

/// One annotated snapshot of the loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressFrame {
    /// 0 for the initial state, then the retrain number
    pub iteration: usize,
    pub drift_ratio: f64,
    pub drifted_columns: usize,
    pub total_columns: usize,
    /// "Initial State" or "Retrain #N"
    pub label: String,
    pub image: VisualArtifact,
}

/// Overlays iteration and drift metrics on the latest visualization.
///
/// The panel sits in the top-left corner and is coloured by severity band.
/// Without a base image a blank canvas is used; without a font only the
/// panel and its ratio bar are drawn.
#[derive(Clone, Debug)]
pub struct ProgressFrameRecorder {
    bands: SeverityBands,
    width: u32,
    height: u32,
    font_path: Option<PathBuf>,
}

impl ProgressFrameRecorder {
    /// `width`/`height` size the placeholder canvas.
    pub fn new(bands: SeverityBands, width: u32, height: u32) -> Self {
        Self { bands, width, height, font_path: None }
    }

    pub fn with_font(mut self, path: Option<PathBuf>) -> Self {
        self.font_path = path;
        self
    }

    pub fn bands(&self) -> &SeverityBands {
        &self.bands
    }

    pub fn label_for(iteration: usize) -> String {
        if iteration == 0 {
            "Initial State".to_string()
        } else {
            format!("Retrain #{iteration}")
        }
    }

    /// Annotated copy of `base`. The base image itself is never modified.
    pub fn record(
        &self,
        base: Option<&VisualArtifact>,
        iteration: usize,
        summary: &DriftSummary,
    ) -> ProgressFrame {
        let mut image = match base {
            Some(v) => v.clone(),
            None => {
                debug!(iteration, "no visualization yet; using placeholder canvas");
                VisualArtifact::blank(self.width, self.height)
            }
        };
        let label = Self::label_for(iteration);

        let text = ensure_font(self.font_path.as_deref());
        if let Err(e) = self.annotate(&mut image, &label, summary, text) {
            warn!(iteration, error = %e, "frame annotation failed; keeping plain image");
            image = base.cloned().unwrap_or_else(|| VisualArtifact::blank(self.width, self.height));
        }

        ProgressFrame {
            iteration,
            drift_ratio: summary.drift_ratio(),
            drifted_columns: summary.drifted_columns,
            total_columns: summary.total_columns,
            label,
            image,
        }
    }

    fn annotate(
        &self,
        image: &mut VisualArtifact,
        label: &str,
        summary: &DriftSummary,
        text: bool,
    ) -> Result<()> {
        let ratio = summary.drift_ratio();
        let (r, g, b) = self.bands.classify(ratio).rgb();
        let color = RGBColor(r, g, b);
        let (w, h) = (image.width, image.height);

        let root = BitMapBackend::with_buffer(&mut image.pixels, (w, h)).into_drawing_area();
        let (x0, y0) = (10i32, 10i32);
        let x1 = (x0 + 300).min(w as i32 - 1);
        let y1 = (y0 + 110).min(h as i32 - 1);

        root.draw(&Rectangle::new([(x0, y0), (x1, y1)], WHITE.mix(0.85).filled()))
            .map_err(render_err)?;
        root.draw(&Rectangle::new([(x0, y0), (x1, y1)], color.stroke_width(3)))
            .map_err(render_err)?;

        let (bar_x0, bar_x1) = (x0 + 12, x1 - 12);
        let (bar_y0, bar_y1) = ((y1 - 22).max(y0), (y1 - 10).max(y0));
        let filled = bar_x0 + ((bar_x1 - bar_x0) as f64 * ratio.clamp(0.0, 1.0)).round() as i32;
        root.draw(&Rectangle::new([(bar_x0, bar_y0), (bar_x1, bar_y1)], RGBColor(0xe9, 0xec, 0xef).filled()))
            .map_err(render_err)?;
        root.draw(&Rectangle::new([(bar_x0, bar_y0), (filled, bar_y1)], color.filled()))
            .map_err(render_err)?;

        if text {
            let lines = [
                (label.to_string(), 22),
                (format!("Drift: {:.1}%", ratio * 100.0), 17),
                (format!("Drifted columns: {}/{}", summary.drifted_columns, summary.total_columns), 15),
            ];
            let mut y = y0 + 8;
            for (line, size) in lines {
                root.draw(&Text::new(line, (x0 + 12, y), (FONT_FAMILY, size).into_font().color(&BLACK)))
                    .map_err(render_err)?;
                y += size + 6;
            }
        }

        root.present().map_err(render_err)
    }
}
