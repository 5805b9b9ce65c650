//! driftloop: human-in-the-loop drift monitoring and retraining.
//!
//! Compares a reference dataset against current data, reports the share of
//! drifted columns, and on approval blends current rows into the reference
//! and retrains until drift falls below the threshold. Each iteration is
//! captured as a frame of an animated progress timeline.
//!
//! # Modules
//!
//! - [`dataset`]: tabular data, CSV codec, dataset stores
//! - [`eval::drift`]: per-column statistical drift tests and reports
//! - [`eval::retrain`]: the approve / auto-resolve retraining loop
//! - [`trainer`]: model training capability
//! - [`report`]: dashboard rendering
//! - [`timeline`]: progress frames and the animated GIF
//! - [`config`]: YAML configuration and CLI arguments

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod eval;
pub mod report;
pub mod timeline;
pub mod trainer;

pub use error::{Error, Result};
