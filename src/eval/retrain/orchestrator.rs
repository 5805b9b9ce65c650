//! The iterate-until-converged retrain loop.

use std::path::PathBuf;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::blend::ReferenceBlender;
use super::inject::{DemoDriftInjector, DEFAULT_DEMO_ROWS};
use super::types::{
    AutoResolveResult, Decision, DecisionOutcome, LoopOutcome, ResetOutcome, RetrainAttempt,
};
use crate::config::{PipelineConfig, TrainerKind};
use crate::dataset::{Dataset, DatasetStore, LocalDatasetStore};
use crate::error::{Error, Result};
use crate::eval::drift::{
    DriftEvaluator, DriftReport, DriftSummary, SeverityBands, StatisticalDriftConfig,
    StatisticalDriftEvaluator,
};
use crate::report::{PlottersReporter, Reporter, VisualArtifact};
use crate::timeline::{ProgressFrameRecorder, ProgressTimelineBuilder};
use crate::trainer::{CentroidTrainer, CommandTrainer, Trainer};

/// Settings the loop itself acts on
#[derive(Clone, Debug, PartialEq)]
pub struct OrchestratorConfig {
    /// Reference dataset name in the store
    pub reference: String,
    /// Current dataset name in the store
    pub current: String,
    pub label_column: String,
    /// `ratio >= threshold` needs action; `ratio < threshold` is converged
    pub threshold: f64,
    pub max_iterations: usize,
    pub blend_min: f64,
    pub blend_max: f64,
    pub demo_rows: usize,
    pub bands: SeverityBands,
    /// Where the drift report JSON is written
    pub report_path: PathBuf,
    pub evaluator_timeout: Option<Duration>,
    pub trainer_timeout: Option<Duration>,
    pub reporter_timeout: Option<Duration>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for OrchestratorConfig {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            reference: config.data.reference.clone(),
            current: config.data.current.clone(),
            label_column: config.data.label_column.clone(),
            threshold: config.drift.threshold,
            max_iterations: config.retrain.max_iterations,
            blend_min: config.retrain.blend_min,
            blend_max: config.retrain.blend_max,
            demo_rows: config.retrain.demo_rows,
            bands: config.timeline.bands(),
            report_path: config.report_path(),
            evaluator_timeout: config.drift.timeout(),
            trainer_timeout: config.trainer.timeout(),
            reporter_timeout: None,
        }
    }
}

/// Owns the drift → blend → retrain → re-check state machine.
///
/// Every mutating operation takes `&mut self`, so one orchestrator runs one
/// operation at a time.
pub struct RetrainOrchestrator {
    config: OrchestratorConfig,
    store: Box<dyn DatasetStore>,
    evaluator: Box<dyn DriftEvaluator>,
    trainer: Box<dyn Trainer>,
    reporter: Option<Box<dyn Reporter>>,
    recorder: ProgressFrameRecorder,
    timeline: ProgressTimelineBuilder,
    rng: StdRng,
    last_summary: Option<DriftSummary>,
    last_visual: Option<VisualArtifact>,
    attempts_made: usize,
    /// Set while `auto_resolve` is running; frames are only captured then.
    recording: bool,
}

impl RetrainOrchestrator {
    pub fn new(
        config: OrchestratorConfig,
        store: Box<dyn DatasetStore>,
        evaluator: Box<dyn DriftEvaluator>,
        trainer: Box<dyn Trainer>,
    ) -> Self {
        let report_dir = config
            .report_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            recorder: ProgressFrameRecorder::new(config.bands, 1000, 700),
            timeline: ProgressTimelineBuilder::new(
                report_dir.join("frames"),
                report_dir.join("retrain_progress.gif"),
            ),
            config,
            store,
            evaluator,
            trainer,
            reporter: None,
            rng: StdRng::from_os_rng(),
            last_summary: None,
            last_visual: None,
            attempts_made: 0,
            recording: false,
        }
    }

    /// Wire up the filesystem store, statistical evaluator, configured trainer
    /// and plotters reporter.
    pub fn from_pipeline_config(config: &PipelineConfig) -> Self {
        let excluded_columns = if config.drift.exclude_label {
            vec![config.data.label_column.clone()]
        } else {
            Vec::new()
        };
        let evaluator = StatisticalDriftEvaluator::new(StatisticalDriftConfig {
            p_value: config.drift.p_value,
            categorical_max_unique: config.drift.categorical_max_unique,
            dataset_drift_share: config.drift.dataset_drift_share,
            excluded_columns,
        });

        let trainer: Box<dyn Trainer> = match config.trainer.kind {
            TrainerKind::Builtin => Box::new(CentroidTrainer::new(
                &config.trainer.model_path,
                &config.data.label_column,
            )),
            TrainerKind::Command => Box::new(CommandTrainer::new(
                config.trainer.program.clone().unwrap_or_default(),
                config.trainer.args.clone(),
                &config.trainer.model_path,
                &config.data.label_column,
            )),
        };

        let bands = config.timeline.bands();
        let font = config.report.font_path.clone();
        let reporter = PlottersReporter::new(&config.report.dir, config.report.width, config.report.height)
            .with_threshold(config.drift.threshold)
            .with_bands(bands)
            .with_font(font.clone());
        let recorder = ProgressFrameRecorder::new(bands, config.report.width, config.report.height)
            .with_font(font);
        let timeline = ProgressTimelineBuilder::new(config.frame_dir(), config.timeline_path())
            .with_frame_duration(config.timeline.frame_duration_ms);

        let orchestrator = Self::new(
            OrchestratorConfig::from(config),
            Box::new(LocalDatasetStore::new(&config.data.dir)),
            Box::new(evaluator),
            trainer,
        )
        .with_reporter(Box::new(reporter))
        .with_recorder(recorder)
        .with_timeline(timeline);

        match config.retrain.seed {
            Some(seed) => orchestrator.with_seed(seed),
            None => orchestrator,
        }
    }

    pub fn with_reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn with_recorder(mut self, recorder: ProgressFrameRecorder) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn with_timeline(mut self, timeline: ProgressTimelineBuilder) -> Self {
        self.timeline = timeline;
        self
    }

    /// Deterministic random source
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Summary of the most recent successful evaluation
    pub fn last_summary(&self) -> Option<&DriftSummary> {
        self.last_summary.as_ref()
    }

    pub fn timeline(&self) -> &ProgressTimelineBuilder {
        &self.timeline
    }

    fn load_named(&self, name: &str, role: &str) -> Result<Dataset> {
        if !self.store.exists(name) {
            return Err(Error::evaluation(format!("{role} dataset '{name}' not found")));
        }
        let data = self.store.load(name)?;
        if data.is_empty() {
            return Err(Error::evaluation(format!("{role} dataset '{name}' has no rows")));
        }
        Ok(data)
    }

    /// Reference and current, with current in the reference column order.
    fn load_pair(&self) -> Result<(Dataset, Dataset)> {
        let reference = self.load_named(&self.config.reference, "reference")?;
        let current = self.load_named(&self.config.current, "current")?;
        let current = current.aligned_to(&reference)?;
        Ok((reference, current))
    }

    /// Measure drift, persist the report and refresh the visualization.
    pub fn evaluate(&mut self) -> Result<DriftSummary> {
        let (reference, current) = self.load_pair()?;
        let summary = self.evaluator.evaluate(&reference, &current, self.config.evaluator_timeout)?;
        info!(
            evaluator = self.evaluator.name(),
            drifted = summary.drifted_columns,
            total = summary.total_columns,
            ratio = summary.drift_ratio(),
            "drift evaluated"
        );

        DriftReport::new(summary.clone(), self.config.threshold, &self.config.bands)
            .save(&self.config.report_path)?;

        if let Some(reporter) = &self.reporter {
            match reporter.render(&summary, &reference, &current, self.config.reporter_timeout) {
                Ok(visual) => self.last_visual = Some(visual),
                Err(e) => {
                    warn!(error = %e, "drift visualization failed; continuing without it");
                    self.last_visual = None;
                }
            }
        }

        self.last_summary = Some(summary.clone());
        Ok(summary)
    }

    /// One retrain cycle: blend, persist, train, re-evaluate, record a frame.
    ///
    /// If training fails the reference stays blended.
    pub fn approve_once(&mut self) -> Result<RetrainAttempt> {
        let drift_before = self
            .last_summary
            .clone()
            .ok_or_else(|| Error::state("approve requested before any drift evaluation"))?;

        let (mut reference, current) = self.load_pair()?;
        let lo = self.config.blend_min.min(self.config.blend_max);
        let hi = self.config.blend_min.max(self.config.blend_max);
        let fraction = self.rng.random_range(lo..=hi);

        self.attempts_made += 1;
        let iteration = self.attempts_made;
        let rows_replaced = ReferenceBlender::blend(&mut reference, &current, fraction, &mut self.rng)?;
        info!(iteration, fraction, rows_replaced, "reference blended");
        self.store.save(&self.config.reference, &reference)?;

        let training_data = reference.concat(&current)?;
        debug!(iteration, rows = training_data.n_rows(), trainer = self.trainer.name(), "training");
        let model = self.trainer.train(&training_data, self.config.trainer_timeout)?;
        info!(iteration, model = %model.path.display(), "model retrained");

        let drift_after = self.evaluate()?;
        if self.recording {
            self.capture_frame(iteration, &drift_after);
        }

        Ok(RetrainAttempt {
            iteration,
            succeeded: !drift_after.needs_action(self.config.threshold),
            drift_before,
            rows_replaced_fraction: fraction,
            rows_replaced,
            drift_after,
            model,
        })
    }

    /// Retrain until drift falls below the threshold, `max_iterations`
    /// attempts have been made, or a step fails.
    pub fn auto_resolve(&mut self, max_iterations: usize) -> AutoResolveResult {
        self.timeline.reset();
        self.attempts_made = 0;
        self.recording = true;
        let mut attempts = Vec::new();

        let mut summary = match self.evaluate() {
            Ok(s) => s,
            Err(e) => {
                return self.finish(LoopOutcome::Failed { error: e.to_string() }, 0, attempts, None);
            }
        };
        self.capture_frame(0, &summary);

        let mut iterations = 0;
        loop {
            let ratio = summary.drift_ratio();
            if !summary.needs_action(self.config.threshold) {
                return self.finish(LoopOutcome::Converged, iterations, attempts, Some(ratio));
            }
            if iterations >= max_iterations {
                return self.finish(LoopOutcome::Exhausted, iterations, attempts, Some(ratio));
            }

            iterations += 1;
            info!(iteration = iterations, max_iterations, ratio, "retraining");
            match self.approve_once() {
                Ok(attempt) => {
                    summary = attempt.drift_after.clone();
                    attempts.push(attempt);
                }
                Err(e) => {
                    warn!(iteration = iterations, error = %e, "retrain attempt failed");
                    return self.finish(
                        LoopOutcome::Failed { error: e.to_string() },
                        iterations,
                        attempts,
                        Some(ratio),
                    );
                }
            }
        }
    }

    fn finish(
        &mut self,
        outcome: LoopOutcome,
        iterations: usize,
        attempts: Vec<RetrainAttempt>,
        final_ratio: Option<f64>,
    ) -> AutoResolveResult {
        self.recording = false;
        let timeline = match self.timeline.finalize() {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "progress timeline could not be assembled");
                None
            }
        };
        info!(?outcome, iterations, ?final_ratio, "auto-resolve finished");
        AutoResolveResult { outcome, iterations, final_ratio, attempts, timeline }
    }

    fn capture_frame(&mut self, iteration: usize, summary: &DriftSummary) {
        let frame = self.recorder.record(self.last_visual.as_ref(), iteration, summary);
        if let Err(e) = self.timeline.add_frame(frame) {
            warn!(iteration, error = %e, "could not write progress frame");
        }
    }

    /// Replace the reference with a perturbed copy of current and re-evaluate.
    ///
    /// Never fails; problems are reported in the outcome.
    pub fn reset_demo(&mut self) -> ResetOutcome {
        match self.try_reset_demo() {
            Ok(summary) => ResetOutcome {
                success: true,
                message: format!(
                    "Demo reset: {}/{} columns drifted ({:.1}%)",
                    summary.drifted_columns,
                    summary.total_columns,
                    summary.drift_ratio() * 100.0
                ),
                summary: Some(summary),
            },
            Err(e) => {
                warn!(error = %e, "demo reset failed");
                ResetOutcome { success: false, message: format!("Demo reset failed: {e}"), summary: None }
            }
        }
    }

    fn try_reset_demo(&mut self) -> Result<DriftSummary> {
        let current = self.load_named(&self.config.current, "current")?;
        let rows = if self.config.demo_rows == 0 { DEFAULT_DEMO_ROWS } else { self.config.demo_rows };
        let reference =
            DemoDriftInjector::inject(&current, &self.config.label_column, rows, &mut self.rng);
        self.store.save(&self.config.reference, &reference)?;
        info!(rows = reference.n_rows(), "reference rebuilt with injected drift");

        self.last_summary = None;
        self.last_visual = None;
        self.attempts_made = 0;
        self.timeline.reset();
        self.evaluate()
    }

    /// Record a rejection. Nothing is mutated.
    pub fn reject(&self) -> DecisionOutcome {
        info!("retraining rejected");
        DecisionOutcome {
            decision: Decision::Reject,
            message: "Retraining rejected; reference data and model left unchanged".to_string(),
        }
    }
}
