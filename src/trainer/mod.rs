//! Model training backends.
//!
//! The retrain loop only needs to know that training succeeded and where the
//! artifact landed. Two backends are provided:
//!
//! - [`CentroidTrainer`]: built-in nearest-centroid classifier (JSON model)
//! - [`CommandTrainer`]: runs an external training program
//!
//! Both write the model to a temporary path and rename it on success, so a
//! failed run never leaves a partial artifact behind.

mod artifact;
mod centroid;
mod command;

#[cfg(test)]
mod tests;

use std::time::Duration;

use crate::dataset::Dataset;
use crate::error::Result;

pub use artifact::{temp_path_for, ModelArtifact};
pub use centroid::{CentroidModel, CentroidTrainer, ClassCentroid};
pub use command::{CommandTrainer, DEFAULT_COMMAND_ARGS};

/// Produces a persisted model from a labeled dataset.
pub trait Trainer {
    /// Train on `data`, giving up after `timeout` where the backend can
    /// enforce it.
    fn train(&self, data: &Dataset, timeout: Option<Duration>) -> Result<ModelArtifact>;

    /// Backend name recorded in the artifact
    fn name(&self) -> &str;
}
