//! Outcomes of the retrain loop.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::eval::drift::DriftSummary;
use crate::trainer::ModelArtifact;

/// One blend + retrain + re-evaluate cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrainAttempt {
    /// 1-based attempt number within the run
    pub iteration: usize,
    /// Summary the attempt started from
    pub drift_before: DriftSummary,
    /// Blend fraction drawn for this attempt
    pub rows_replaced_fraction: f64,
    /// Reference rows overwritten
    pub rows_replaced: usize,
    /// Summary after retraining
    pub drift_after: DriftSummary,
    /// Model produced by the trainer
    pub model: ModelArtifact,
    /// Whether drift fell below the threshold after this attempt
    pub succeeded: bool,
}

impl RetrainAttempt {
    /// Change in drift ratio (negative is an improvement)
    pub fn ratio_delta(&self) -> f64 {
        self.drift_after.drift_ratio() - self.drift_before.drift_ratio()
    }
}

/// Terminal state of an auto-resolve run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoopOutcome {
    /// Drift ratio fell below the threshold
    Converged,
    /// Attempt budget used up while drift stayed at or above the threshold
    Exhausted,
    /// Evaluation, training or IO failed
    Failed { error: String },
}

/// Result of [`RetrainOrchestrator::auto_resolve`](super::RetrainOrchestrator::auto_resolve)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoResolveResult {
    pub outcome: LoopOutcome,
    /// Attempts started, including a failing one
    pub iterations: usize,
    /// Last measured drift ratio; `None` if no evaluation succeeded during this run
    pub final_ratio: Option<f64>,
    pub attempts: Vec<RetrainAttempt>,
    /// Animated progress timeline, when one could be assembled
    pub timeline: Option<PathBuf>,
}

impl AutoResolveResult {
    pub fn success(&self) -> bool {
        self.outcome == LoopOutcome::Converged
    }

    /// One-line explanation of why the loop stopped.
    pub fn message(&self) -> String {
        let ratio = self
            .final_ratio
            .map_or_else(|| "unknown".to_string(), |r| format!("{:.1}%", r * 100.0));
        match &self.outcome {
            LoopOutcome::Converged => {
                format!("Converged after {} iteration(s); drift {ratio}", self.iterations)
            }
            LoopOutcome::Exhausted => format!(
                "Stopped after {} iteration(s) without converging; drift {ratio}",
                self.iterations
            ),
            LoopOutcome::Failed { error } => {
                format!("Failed at iteration {}; drift {ratio}: {error}", self.iterations)
            }
        }
    }
}

/// Result of a demo reset. Resets never return an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetOutcome {
    pub success: bool,
    pub message: String,
    /// Drift of the fresh reference, when re-evaluation succeeded
    pub summary: Option<DriftSummary>,
}

/// Operator answer to a drift alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Run one retrain cycle
    Approve,
    /// Leave everything as is
    Reject,
    /// Retrain until converged or out of attempts
    Auto,
}

impl std::str::FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "y" | "yes" | "approve" => Ok(Decision::Approve),
            "n" | "no" | "reject" => Ok(Decision::Reject),
            "a" | "auto" => Ok(Decision::Auto),
            _ => Err(format!("Unknown decision: {}. Answer y, n or a", s.trim())),
        }
    }
}

/// Informational response to a decision that changes nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub decision: Decision,
    pub message: String,
}
