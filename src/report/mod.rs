//! Drift visualization.
//!
//! A [`Reporter`] turns a drift summary into the static dashboard image and a
//! text summary. The returned [`VisualArtifact`] is the base image progress
//! frames are annotated on.

mod dashboard;
pub mod font;
mod visual;


use std::time::Duration;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::eval::drift::DriftSummary;

pub use dashboard::{PlottersReporter, SUMMARY_FILE, VISUALIZATION_FILE};
pub(crate) use visual::render_err;
pub use visual::VisualArtifact;

/// Renders the drift visualization for one evaluation.
pub trait Reporter {
    fn render(
        &self,
        summary: &DriftSummary,
        reference: &Dataset,
        current: &Dataset,
        timeout: Option<Duration>,
    ) -> Result<VisualArtifact>;
}
