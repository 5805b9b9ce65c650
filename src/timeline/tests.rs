//! Tests for the progress timeline.

use super::*;
use approx::assert_abs_diff_eq;
use crate::eval::drift::{DriftSummary, Severity, SeverityBands};
use crate::report::VisualArtifact;

fn recorder() -> ProgressFrameRecorder {
    ProgressFrameRecorder::new(SeverityBands::default(), 400, 300)
}

#[test]
fn test_labels() {
    assert_eq!(ProgressFrameRecorder::label_for(0), "Initial State");
    assert_eq!(ProgressFrameRecorder::label_for(3), "Retrain #3");
}

#[test]
fn test_record_without_base_uses_placeholder() {
    let frame = recorder().record(None, 0, &DriftSummary::from_counts(10, 3, true));
    assert_eq!(frame.iteration, 0);
    assert_eq!(frame.label, "Initial State");
    assert_eq!((frame.image.width, frame.image.height), (400, 300));
    assert_abs_diff_eq!(frame.drift_ratio, 0.3, epsilon = 1e-12);
    assert_eq!((frame.drifted_columns, frame.total_columns), (3, 10));
}

#[test]
fn test_record_panel_uses_severity_colour() {
    let summary = DriftSummary::from_counts(10, 3, true);
    let frame = recorder().record(None, 1, &summary);
    // Top edge of the panel border.
    let (r, g, b) = Severity::High.rgb();
    assert_eq!(frame.image.pixel(60, 10), Some((r, g, b)));
    // Far corner stays untouched.
    assert_eq!(frame.image.pixel(399, 299), Some((255, 255, 255)));
}

#[test]
fn test_record_does_not_mutate_base() {
    let base = VisualArtifact::blank(400, 300);
    let frame = recorder().record(Some(&base), 2, &DriftSummary::from_counts(10, 0, false));
    assert_eq!(base, VisualArtifact::blank(400, 300));
    assert_ne!(frame.image, base);
    assert_eq!(frame.label, "Retrain #2");
}

#[test]
fn test_finalize_without_frames() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = ProgressTimelineBuilder::new(dir.path().join("frames"), dir.path().join("t.gif"));
    assert!(builder.finalize().unwrap().is_none());
    assert!(!dir.path().join("t.gif").exists());
}

#[test]
fn test_timeline_assembly_removes_frames() {
    let dir = tempfile::tempdir().unwrap();
    let frames = dir.path().join("frames");
    let output = dir.path().join("out/progress.gif");
    let mut builder = ProgressTimelineBuilder::new(&frames, &output).with_frame_duration(100);

    let rec = recorder();
    let first = builder.add_frame(rec.record(None, 0, &DriftSummary::from_counts(10, 5, true))).unwrap();
    let second = builder.add_frame(rec.record(None, 1, &DriftSummary::from_counts(10, 1, false))).unwrap();
    assert!(first.ends_with("frame_000.png"));
    assert!(second.ends_with("frame_001.png"));
    assert!(first.exists() && second.exists());
    assert_eq!(builder.len(), 2);

    let gif = builder.finalize().unwrap();
    assert_eq!(gif.as_deref(), Some(output.as_path()));
    assert!(output.exists());
    assert!(!first.exists() && !second.exists());
    assert!(builder.is_empty());
}

#[test]
fn test_frame_duration_clamped_to_gif_range() {
    let builder = ProgressTimelineBuilder::new("frames", "out.gif");
    assert_eq!(builder.frame_duration_ms(), DEFAULT_FRAME_DURATION_MS);
    assert_eq!(builder.with_frame_duration(0).frame_duration_ms(), 1);

    let long = ProgressTimelineBuilder::new("frames", "out.gif").with_frame_duration(u32::MAX);
    assert_eq!(long.frame_duration_ms(), MAX_FRAME_DURATION_MS);
    assert_eq!(MAX_FRAME_DURATION_MS, 655_350);
}

#[test]
fn test_reset_clears_frames() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = ProgressTimelineBuilder::new(dir.path(), dir.path().join("t.gif"));
    let path = builder.add_frame(recorder().record(None, 0, &DriftSummary::from_counts(1, 0, false))).unwrap();
    builder.reset();
    assert!(builder.is_empty());
    assert!(!path.exists());
}
