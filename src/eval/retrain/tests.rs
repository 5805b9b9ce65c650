//! Tests for the retraining module.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;
use crate::dataset::{Column, Dataset, DatasetStore, InMemoryDatasetStore};
use crate::error::{Error, Result};
use crate::eval::drift::{DriftEvaluator, DriftReport, DriftSummary, SeverityBands};
use crate::timeline::{ProgressFrameRecorder, ProgressTimelineBuilder};
use crate::trainer::{ModelArtifact, Trainer};

fn table(offset: f64, rows: usize) -> Dataset {
    Dataset::new(vec![
        ("tenure".to_string(), Column::Numeric((0..rows).map(|i| i as f64 + offset).collect())),
        (
            "contract".to_string(),
            Column::Text((0..rows).map(|i| format!("c{}", i % 3)).collect()),
        ),
        (
            "Churn".to_string(),
            Column::Numeric((0..rows).map(|i| (i % 2) as f64).collect()),
        ),
    ])
    .unwrap()
}

/// Returns queued summaries in order, then repeats the last one.
struct ScriptedEvaluator {
    script: RefCell<VecDeque<DriftSummary>>,
    last: RefCell<Option<DriftSummary>>,
}

impl ScriptedEvaluator {
    fn new(script: Vec<DriftSummary>) -> Self {
        Self { script: RefCell::new(script.into()), last: RefCell::new(None) }
    }
}

impl DriftEvaluator for ScriptedEvaluator {
    fn evaluate(&self, _: &Dataset, _: &Dataset, _: Option<Duration>) -> Result<DriftSummary> {
        if let Some(next) = self.script.borrow_mut().pop_front() {
            *self.last.borrow_mut() = Some(next);
        }
        self.last.borrow().clone().ok_or_else(|| Error::evaluation("empty script"))
    }
}

/// Counts calls and optionally fails on the n-th one.
struct CountingTrainer {
    calls: Rc<Cell<usize>>,
    fail_on: Option<usize>,
}

impl Trainer for CountingTrainer {
    fn train(&self, data: &Dataset, _: Option<Duration>) -> Result<ModelArtifact> {
        let n = self.calls.get() + 1;
        self.calls.set(n);
        if self.fail_on == Some(n) {
            return Err(Error::training("scripted failure"));
        }
        Ok(ModelArtifact::new("memory/model.json", data.n_rows(), self.name()))
    }

    fn name(&self) -> &str {
        "counting"
    }
}

struct Harness {
    orchestrator: RetrainOrchestrator,
    store: InMemoryDatasetStore,
    trainer_calls: Rc<Cell<usize>>,
    dir: tempfile::TempDir,
}

fn harness(script: Vec<DriftSummary>, threshold: f64, fail_on: Option<usize>) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemoryDatasetStore::with([
        ("reference.csv", table(0.0, 20)),
        ("current.csv", table(100.0, 20)),
    ]);
    let trainer_calls = Rc::new(Cell::new(0));
    let config = OrchestratorConfig {
        threshold,
        report_path: dir.path().join("drift_report.json"),
        ..Default::default()
    };
    let orchestrator = RetrainOrchestrator::new(
        config,
        Box::new(store.clone()),
        Box::new(ScriptedEvaluator::new(script)),
        Box::new(CountingTrainer { calls: Rc::clone(&trainer_calls), fail_on }),
    )
    .with_recorder(ProgressFrameRecorder::new(SeverityBands::default(), 200, 150))
    .with_timeline(ProgressTimelineBuilder::new(dir.path().join("frames"), dir.path().join("progress.gif")))
    .with_seed(7);
    Harness { orchestrator, store, trainer_calls, dir }
}

fn counts(total: usize, drifted: usize) -> DriftSummary {
    DriftSummary::from_counts(total, drifted, false)
}

// ---------------------------------------------------------------------------
// ReferenceBlender
// ---------------------------------------------------------------------------

#[test]
fn test_rows_to_replace() {
    assert_eq!(ReferenceBlender::rows_to_replace(10, 0.5), 5);
    assert_eq!(ReferenceBlender::rows_to_replace(10, 0.45), 5);
    assert_eq!(ReferenceBlender::rows_to_replace(10, 0.44), 4);
    assert_eq!(ReferenceBlender::rows_to_replace(10, 1.5), 10);
    assert_eq!(ReferenceBlender::rows_to_replace(10, -0.2), 0);
    assert_eq!(ReferenceBlender::rows_to_replace(10, f64::NAN), 0);
    assert_eq!(ReferenceBlender::rows_to_replace(0, 0.5), 0);
}

#[test]
fn test_blend_replaces_exact_count() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut reference = table(0.0, 10);
    let current = table(100.0, 10);

    let replaced = ReferenceBlender::blend(&mut reference, &current, 0.5, &mut rng).unwrap();
    assert_eq!(replaced, 5);
    assert_eq!(reference.n_rows(), 10);

    let tenure = reference.column("tenure").and_then(Column::as_numeric).unwrap();
    let from_current = tenure.iter().filter(|&&x| x >= 100.0).count();
    assert_eq!(from_current, 5);
}

#[test]
fn test_full_blend_copies_whole_rows() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut reference = table(0.0, 12);
    let current = table(100.0, 6);
    ReferenceBlender::blend(&mut reference, &current, 1.0, &mut rng).unwrap();

    let current_rows: Vec<Vec<String>> = (0..current.n_rows()).map(|i| current.row(i)).collect();
    for i in 0..reference.n_rows() {
        assert!(current_rows.contains(&reference.row(i)));
    }
}

#[test]
fn test_blend_aligns_current_columns() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut reference = table(0.0, 4);
    let current = table(100.0, 4);
    let reordered = Dataset::new(vec![
        ("Churn".to_string(), current.column("Churn").unwrap().clone()),
        ("tenure".to_string(), current.column("tenure").unwrap().clone()),
        ("contract".to_string(), current.column("contract").unwrap().clone()),
    ])
    .unwrap();

    ReferenceBlender::blend(&mut reference, &reordered, 1.0, &mut rng).unwrap();
    assert_eq!(reference.column_names(), &["tenure", "contract", "Churn"]);
    assert!(reference.column("tenure").and_then(Column::as_numeric).unwrap().iter().all(|&x| x >= 100.0));
}

#[test]
fn test_blend_from_empty_current() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut reference = table(0.0, 10);
    let empty = table(0.0, 0);
    assert!(ReferenceBlender::blend(&mut reference, &empty, 0.5, &mut rng).is_err());
    assert_eq!(ReferenceBlender::blend(&mut reference, &empty, 0.0, &mut rng).unwrap(), 0);
}

#[test]
fn test_blend_demotes_conflicting_column() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut reference =
        Dataset::new(vec![("x".to_string(), Column::Numeric(vec![1.0, 2.0, 3.0, 4.0]))]).unwrap();
    let current =
        Dataset::new(vec![("x".to_string(), Column::Text(vec!["a".to_string(), "b".to_string()]))])
            .unwrap();
    ReferenceBlender::blend(&mut reference, &current, 0.5, &mut rng).unwrap();
    assert!(!reference.column("x").unwrap().is_numeric());
    assert_eq!(reference.n_rows(), 4);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_blend_preserves_shape(
        n in 1usize..60,
        m in 1usize..30,
        fraction in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut reference = table(0.0, n);
        let current = table(1000.0, m);
        let names = reference.column_names().to_vec();

        let replaced = ReferenceBlender::blend(&mut reference, &current, fraction, &mut rng).unwrap();

        prop_assert_eq!(reference.n_rows(), n);
        prop_assert_eq!(reference.column_names(), names.as_slice());
        prop_assert_eq!(replaced, ReferenceBlender::rows_to_replace(n, fraction));
        let tenure = reference.column("tenure").and_then(Column::as_numeric).unwrap();
        prop_assert_eq!(tenure.iter().filter(|&&x| x >= 1000.0).count(), replaced);
    }
}

// ---------------------------------------------------------------------------
// DemoDriftInjector
// ---------------------------------------------------------------------------

#[test]
fn test_inject_perturbs_numeric_features_only() {
    let mut rng = StdRng::seed_from_u64(11);
    let current = table(50.0, 40);
    let drifted = DemoDriftInjector::inject(&current, "Churn", DEFAULT_DEMO_ROWS, &mut rng);

    assert_eq!(drifted.n_rows(), 40);
    assert_eq!(drifted.column("Churn"), current.column("Churn"));
    assert_eq!(drifted.column("contract"), current.column("contract"));
    assert_ne!(drifted.column("tenure"), current.column("tenure"));
}

#[test]
fn test_inject_transform_is_affine_per_column() {
    let mut rng = StdRng::seed_from_u64(12);
    let current = table(0.0, 10);
    let drifted = DemoDriftInjector::inject(&current, "Churn", 10, &mut rng);
    let before = current.column("tenure").and_then(Column::as_numeric).unwrap();
    let after = drifted.column("tenure").and_then(Column::as_numeric).unwrap();

    let shift = after[0] - before[0];
    let scale = after[1] - after[0];
    assert!((0.5..1.5).contains(&scale));
    assert!((-10.0..10.0).contains(&shift));
    for (x, y) in before.iter().zip(after) {
        assert_abs_diff_eq!(x * scale + shift, *y, epsilon = 1e-9);
    }
}

#[test]
fn test_inject_truncates() {
    let mut rng = StdRng::seed_from_u64(13);
    let drifted = DemoDriftInjector::inject(&table(0.0, 30), "Churn", 8, &mut rng);
    assert_eq!(drifted.n_rows(), 8);
}

// ---------------------------------------------------------------------------
// RetrainOrchestrator
// ---------------------------------------------------------------------------

#[test]
fn test_approve_before_evaluate_is_state_error() {
    let mut h = harness(vec![counts(10, 3)], 0.25, None);
    let err = h.orchestrator.approve_once().unwrap_err();
    assert!(matches!(err, Error::State { .. }));
    assert_eq!(h.trainer_calls.get(), 0);
}

#[test]
fn test_evaluate_persists_report() {
    let mut h = harness(vec![counts(10, 3)], 0.25, None);
    let summary = h.orchestrator.evaluate().unwrap();
    assert_eq!(summary.drifted_columns, 3);
    assert_eq!(h.orchestrator.last_summary(), Some(&summary));

    let report = DriftReport::load(h.dir.path().join("drift_report.json")).unwrap();
    assert_eq!(report.summary, summary);
    assert!(report.needs_action);
    assert_eq!(report.threshold, 0.25);
}

#[test]
fn test_evaluate_rejects_schema_mismatch() {
    let mut h = harness(vec![counts(10, 3)], 0.25, None);
    let other = Dataset::new(vec![("tenure".to_string(), Column::Numeric(vec![1.0]))]).unwrap();
    h.store.save("current.csv", &other).unwrap();
    assert!(matches!(h.orchestrator.evaluate().unwrap_err(), Error::Evaluation { .. }));
}

#[test]
fn test_evaluate_rejects_empty_dataset() {
    let mut h = harness(vec![counts(10, 3)], 0.25, None);
    h.store.save("reference.csv", &table(0.0, 0)).unwrap();
    let err = h.orchestrator.evaluate().unwrap_err();
    assert!(err.to_string().contains("no rows"));
}

#[test]
fn test_approve_once_blends_trains_and_reevaluates() {
    let mut h = harness(vec![counts(10, 5), counts(10, 2)], 0.25, None);
    h.orchestrator.evaluate().unwrap();
    let attempt = h.orchestrator.approve_once().unwrap();

    assert_eq!(attempt.iteration, 1);
    assert!((0.4..=0.6).contains(&attempt.rows_replaced_fraction));
    assert_eq!(attempt.rows_replaced, ReferenceBlender::rows_to_replace(20, attempt.rows_replaced_fraction));
    assert_eq!(attempt.drift_before.drifted_columns, 5);
    assert_eq!(attempt.drift_after.drifted_columns, 2);
    assert!(attempt.succeeded);
    assert_eq!(attempt.model.rows, 40);
    assert!(attempt.ratio_delta() < 0.0);
    assert_eq!(h.orchestrator.timeline().len(), 0);

    let stored = h.store.load("reference.csv").unwrap();
    assert_eq!(stored.n_rows(), 20);
    assert_ne!(stored, table(0.0, 20));
}

#[test]
fn test_immediate_convergence() {
    let mut h = harness(vec![counts(10, 0)], 0.25, None);
    let result = h.orchestrator.auto_resolve(10);

    assert_eq!(result.outcome, LoopOutcome::Converged);
    assert!(result.success());
    assert_eq!(result.iterations, 0);
    assert!(result.attempts.is_empty());
    assert_eq!(result.final_ratio, Some(0.0));
    assert_eq!(h.trainer_calls.get(), 0);
    assert_eq!(result.timeline, Some(h.dir.path().join("progress.gif")));
}

#[test]
fn test_exhausted_after_budget() {
    let mut h = harness(vec![counts(10, 3)], 0.10, None);
    let result = h.orchestrator.auto_resolve(1);

    assert_eq!(result.outcome, LoopOutcome::Exhausted);
    assert_eq!(result.iterations, 1);
    assert_eq!(result.attempts.len(), 1);
    assert!(!result.attempts[0].succeeded);
    assert_eq!(result.final_ratio, Some(0.3));
    assert!(result.message().contains("without converging"));
}

#[test]
fn test_never_exceeds_max_iterations() {
    let mut h = harness(vec![counts(10, 5)], 0.25, None);
    let result = h.orchestrator.auto_resolve(4);
    assert_eq!(result.outcome, LoopOutcome::Exhausted);
    assert_eq!(result.iterations, 4);
    assert_eq!(h.trainer_calls.get(), 4);
    let numbers: Vec<usize> = result.attempts.iter().map(|a| a.iteration).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
}

#[test]
fn test_converges_after_two_attempts() {
    let mut h = harness(vec![counts(10, 5), counts(10, 4), counts(10, 1)], 0.25, None);
    let result = h.orchestrator.auto_resolve(10);

    assert_eq!(result.outcome, LoopOutcome::Converged);
    assert_eq!(result.iterations, 2);
    assert!(!result.attempts[0].succeeded);
    assert!(result.attempts[1].succeeded);
    assert_eq!(result.final_ratio, Some(0.1));

    let gif = result.timeline.unwrap();
    assert!(gif.exists());
    assert!(!h.dir.path().join("frames/frame_000.png").exists());
}

#[test]
fn test_training_failure_keeps_blended_reference() {
    let mut h = harness(vec![counts(10, 5)], 0.25, Some(1));
    let result = h.orchestrator.auto_resolve(10);

    match &result.outcome {
        LoopOutcome::Failed { error } => assert!(error.contains("scripted failure")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(result.iterations, 1);
    assert!(result.attempts.is_empty());
    assert_eq!(result.final_ratio, Some(0.5));

    let stored = h.store.load("reference.csv").unwrap();
    assert_eq!(stored.n_rows(), 20);
    assert_ne!(stored, table(0.0, 20));
}

#[test]
fn test_standalone_approve_records_no_frames() {
    let mut h = harness(vec![counts(10, 5), counts(10, 2)], 0.25, None);
    h.orchestrator.evaluate().unwrap();
    h.orchestrator.approve_once().unwrap();
    let frames = h.dir.path().join("frames");
    drop(h.orchestrator);

    let leftover = std::fs::read_dir(&frames).map(|entries| entries.count()).unwrap_or(0);
    assert_eq!(leftover, 0);
    assert!(!h.dir.path().join("progress.gif").exists());
}

#[test]
fn test_failed_evaluation_ignores_earlier_summary() {
    let mut h = harness(vec![counts(10, 5)], 0.25, None);
    h.orchestrator.evaluate().unwrap();
    assert!(h.orchestrator.last_summary().is_some());

    let other = Dataset::new(vec![("tenure".to_string(), Column::Numeric(vec![1.0]))]).unwrap();
    h.store.save("current.csv", &other).unwrap();
    let result = h.orchestrator.auto_resolve(3);

    assert!(matches!(result.outcome, LoopOutcome::Failed { .. }));
    assert_eq!(result.iterations, 0);
    assert_eq!(result.final_ratio, None);
    assert_eq!(h.trainer_calls.get(), 0);
}

#[test]
fn test_failed_first_evaluation() {
    let dir = tempfile::tempdir().unwrap();
    let mut orchestrator = RetrainOrchestrator::new(
        OrchestratorConfig { report_path: dir.path().join("r.json"), ..Default::default() },
        Box::new(InMemoryDatasetStore::new()),
        Box::new(ScriptedEvaluator::new(vec![counts(1, 0)])),
        Box::new(CountingTrainer { calls: Rc::new(Cell::new(0)), fail_on: None }),
    );
    let result = orchestrator.auto_resolve(3);

    assert!(matches!(result.outcome, LoopOutcome::Failed { .. }));
    assert_eq!(result.iterations, 0);
    assert_eq!(result.final_ratio, None);
    assert_eq!(result.timeline, None);
}

#[test]
fn test_reject_changes_nothing() {
    let mut h = harness(vec![counts(10, 5)], 0.25, None);
    h.orchestrator.evaluate().unwrap();
    let outcome = h.orchestrator.reject();

    assert_eq!(outcome.decision, Decision::Reject);
    assert_eq!(h.store.load("reference.csv").unwrap(), table(0.0, 20));
    assert_eq!(h.trainer_calls.get(), 0);
}

#[test]
fn test_reset_demo_reports_failure_without_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut orchestrator = RetrainOrchestrator::new(
        OrchestratorConfig { report_path: dir.path().join("r.json"), ..Default::default() },
        Box::new(InMemoryDatasetStore::new()),
        Box::new(ScriptedEvaluator::new(vec![counts(1, 0)])),
        Box::new(CountingTrainer { calls: Rc::new(Cell::new(0)), fail_on: None }),
    );
    let outcome = orchestrator.reset_demo();
    assert!(!outcome.success);
    assert!(outcome.message.contains("not found"));
    assert!(outcome.summary.is_none());
}

#[test]
fn test_reset_demo_rebuilds_reference() {
    let mut h = harness(vec![counts(3, 2)], 0.25, None);
    let outcome = h.orchestrator.reset_demo();

    assert!(outcome.success);
    assert_eq!(outcome.summary.as_ref().map(|s| s.drifted_columns), Some(2));
    let reference = h.store.load("reference.csv").unwrap();
    let current = h.store.load("current.csv").unwrap();
    assert_eq!(reference.n_rows(), 20);
    assert_eq!(reference.column("Churn"), current.column("Churn"));
    assert_ne!(reference.column("tenure"), current.column("tenure"));
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = || {
        let mut h = harness(vec![counts(10, 5), counts(10, 5)], 0.25, None);
        h.orchestrator.evaluate().unwrap();
        let attempt = h.orchestrator.approve_once().unwrap();
        (attempt.rows_replaced_fraction, h.store.load("reference.csv").unwrap())
    };
    assert_eq!(run(), run());
}

#[test]
fn test_decision_parse() {
    assert_eq!("y".parse::<Decision>(), Ok(Decision::Approve));
    assert_eq!(" N\n".parse::<Decision>(), Ok(Decision::Reject));
    assert_eq!("a".parse::<Decision>(), Ok(Decision::Auto));
    assert!("maybe".parse::<Decision>().is_err());
}
