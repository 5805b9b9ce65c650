//! Drift evaluation and the retrain loop built on it.
//!
//! ## Architecture
//!
//! - `drift`: per-column statistical drift tests, summaries and reports
//! - `retrain`: blending, demo drift injection and the retrain orchestrator

pub mod drift;
pub mod retrain;

pub use drift::{
    DriftEvaluator, DriftReport, DriftSummary, Severity, SeverityBands, StatisticalDriftEvaluator,
};
pub use retrain::{AutoResolveResult, LoopOutcome, RetrainAttempt, RetrainOrchestrator};
