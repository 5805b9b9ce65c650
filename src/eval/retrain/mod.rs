//! Retraining Module
//!
//! Closes the loop from drift detection to a retrained model:
//! blend current rows into the reference, retrain on both, re-measure, and
//! repeat until drift is below the action threshold.

mod blend;
mod inject;
mod orchestrator;
mod types;

#[cfg(test)]
mod tests;

// Re-export all public types
pub use blend::ReferenceBlender;
pub use inject::{DemoDriftInjector, DEFAULT_DEMO_ROWS};
pub use orchestrator::{OrchestratorConfig, RetrainOrchestrator};
pub use types::{
    AutoResolveResult, Decision, DecisionOutcome, LoopOutcome, ResetOutcome, RetrainAttempt,
};
