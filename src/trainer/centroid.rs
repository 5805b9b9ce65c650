//! Built-in nearest-centroid classifier.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::artifact::{temp_path_for, ModelArtifact};
use super::Trainer;
use crate::dataset::{Column, Dataset};
use crate::error::{Error, Result};

/// Mean standardized feature vector of one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassCentroid {
    pub class: String,
    pub count: usize,
    pub centroid: Vec<f64>,
}

/// Persisted nearest-centroid model.
///
/// Features are standardized with the training mean and standard deviation;
/// missing values contribute nothing to a distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentroidModel {
    pub label: String,
    pub features: Vec<String>,
    pub means: Vec<f64>,
    pub stds: Vec<f64>,
    pub classes: Vec<ClassCentroid>,
}

impl CentroidModel {
    /// Fit on every numeric column except `label`.
    pub fn fit(data: &Dataset, label: &str) -> Result<Self> {
        let labels = data
            .column(label)
            .ok_or_else(|| Error::training(format!("label column '{label}' not found")))?;
        if data.is_empty() {
            return Err(Error::training("no training rows"));
        }

        let features: Vec<String> =
            data.numeric_column_names().into_iter().filter(|n| n != label).collect();
        if features.is_empty() {
            return Err(Error::training("no numeric feature columns"));
        }
        let columns: Vec<&[f64]> = features
            .iter()
            .filter_map(|n| data.column(n).and_then(Column::as_numeric))
            .collect();

        let (means, stds): (Vec<f64>, Vec<f64>) = columns.iter().map(|c| moments(c)).unzip();

        let mut sums: BTreeMap<String, (usize, Vec<f64>, Vec<usize>)> = BTreeMap::new();
        for row in 0..data.n_rows() {
            let entry = sums
                .entry(labels.cell(row))
                .or_insert_with(|| (0, vec![0.0; features.len()], vec![0; features.len()]));
            entry.0 += 1;
            for (j, col) in columns.iter().enumerate() {
                let z = (col[row] - means[j]) / stds[j];
                if !z.is_nan() {
                    entry.1[j] += z;
                    entry.2[j] += 1;
                }
            }
        }

        let classes = sums
            .into_iter()
            .map(|(class, (count, sum, n))| ClassCentroid {
                class,
                count,
                centroid: sum
                    .iter()
                    .zip(&n)
                    .map(|(s, &k)| if k == 0 { 0.0 } else { s / k as f64 })
                    .collect(),
            })
            .collect();

        Ok(Self { label: label.to_string(), features, means, stds, classes })
    }

    /// Class of the nearest centroid for one raw feature vector.
    pub fn predict(&self, features: &[f64]) -> Option<&str> {
        let z: Vec<f64> = features
            .iter()
            .zip(self.means.iter().zip(&self.stds))
            .map(|(x, (m, s))| (x - m) / s)
            .collect();
        self.classes
            .iter()
            .map(|c| {
                let dist: f64 = c
                    .centroid
                    .iter()
                    .zip(&z)
                    .filter(|(_, v)| !v.is_nan())
                    .map(|(a, b)| (a - b).powi(2))
                    .sum();
                (dist, c.class.as_str())
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, class)| class)
    }

    /// Fraction of rows in `data` predicted correctly.
    pub fn accuracy(&self, data: &Dataset) -> Option<f64> {
        let labels = data.column(&self.label)?;
        let columns: Vec<&[f64]> = self
            .features
            .iter()
            .map(|n| data.column(n).and_then(Column::as_numeric))
            .collect::<Option<_>>()?;
        if data.is_empty() {
            return None;
        }
        let correct = (0..data.n_rows())
            .filter(|&row| {
                let x: Vec<f64> = columns.iter().map(|c| c[row]).collect();
                self.predict(&x) == Some(labels.cell(row).as_str())
            })
            .count();
        Some(correct as f64 / data.n_rows() as f64)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("reading model {}", path.display()), e))?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Mean and standard deviation ignoring `NaN`; a zero deviation becomes 1.
fn moments(values: &[f64]) -> (f64, f64) {
    let finite: Vec<f64> = values.iter().copied().filter(|x| !x.is_nan()).collect();
    if finite.is_empty() {
        return (0.0, 1.0);
    }
    let n = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / n;
    let var = finite.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let std = var.sqrt();
    (mean, if std > 0.0 { std } else { 1.0 })
}

/// Trains a [`CentroidModel`] and writes it as JSON.
#[derive(Clone, Debug)]
pub struct CentroidTrainer {
    model_path: PathBuf,
    label: String,
}

impl CentroidTrainer {
    pub fn new(model_path: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self { model_path: model_path.into(), label: label.into() }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl Trainer for CentroidTrainer {
    fn train(&self, data: &Dataset, _timeout: Option<Duration>) -> Result<ModelArtifact> {
        let model = CentroidModel::fit(data, &self.label)?;
        let accuracy = model.accuracy(data).unwrap_or(0.0);

        if let Some(parent) = self.model_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::io(format!("creating {}", parent.display()), e))?;
        }
        let tmp = temp_path_for(&self.model_path);
        let json = serde_json::to_string_pretty(&model)?;
        std::fs::write(&tmp, json)
            .map_err(|e| Error::io(format!("writing model {}", tmp.display()), e))?;
        std::fs::rename(&tmp, &self.model_path)
            .map_err(|e| Error::io(format!("moving model to {}", self.model_path.display()), e))?;

        info!(
            rows = data.n_rows(),
            classes = model.classes.len(),
            accuracy,
            "centroid model trained"
        );
        Ok(ModelArtifact::new(&self.model_path, data.n_rows(), self.name()).with_accuracy(accuracy))
    }

    fn name(&self) -> &str {
        "centroid"
    }
}
