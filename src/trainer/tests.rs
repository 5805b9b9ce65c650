//! Tests for training backends.

use super::*;
use crate::dataset::{Column, Dataset};
use crate::error::Error;

fn labeled() -> Dataset {
    Dataset::new(vec![
        ("tenure".to_string(), Column::Numeric(vec![1.0, 2.0, 3.0, 50.0, 51.0, 52.0])),
        ("charges".to_string(), Column::Numeric(vec![10.0, 11.0, f64::NAN, 90.0, 91.0, 92.0])),
        (
            "Churn".to_string(),
            Column::Text(["Yes", "Yes", "Yes", "No", "No", "No"].map(String::from).to_vec()),
        ),
    ])
    .unwrap()
}

#[test]
fn test_temp_path_for() {
    let p = temp_path_for(std::path::Path::new("models/churn.json"));
    assert_eq!(p, std::path::PathBuf::from("models/churn.json.tmp"));
}

#[test]
fn test_centroid_separable_data() {
    let model = CentroidModel::fit(&labeled(), "Churn").unwrap();
    assert_eq!(model.features, vec!["tenure", "charges"]);
    assert_eq!(model.classes.len(), 2);
    assert_eq!(model.accuracy(&labeled()), Some(1.0));
    assert_eq!(model.predict(&[2.0, 12.0]), Some("Yes"));
    assert_eq!(model.predict(&[49.0, f64::NAN]), Some("No"));
}

#[test]
fn test_centroid_missing_label() {
    let err = CentroidModel::fit(&labeled(), "Missing").unwrap_err();
    assert!(matches!(err, Error::Training { .. }));
}

#[test]
fn test_centroid_no_features() {
    let data = Dataset::new(vec![(
        "Churn".to_string(),
        Column::Text(vec!["Yes".to_string(), "No".to_string()]),
    )])
    .unwrap();
    let err = CentroidModel::fit(&data, "Churn").unwrap_err();
    assert!(matches!(err, Error::Training { .. }));
}

#[test]
fn test_centroid_trainer_writes_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("models/model.json");
    let trainer = CentroidTrainer::new(&path, "Churn");

    let artifact = trainer.train(&labeled(), None).unwrap();
    assert_eq!(artifact.path, path);
    assert_eq!(artifact.rows, 6);
    assert_eq!(artifact.trainer, "centroid");
    assert_eq!(artifact.training_accuracy, Some(1.0));
    assert!(!temp_path_for(&path).exists());

    let loaded = CentroidModel::load(&path).unwrap();
    assert_eq!(loaded.label, "Churn");
}

#[test]
fn test_command_trainer_render_args() {
    let trainer = CommandTrainer::new("train.sh", Vec::new(), "out/model.bin", "Churn");
    let args = trainer.render_args(
        std::path::Path::new("out/training_data.csv"),
        std::path::Path::new("out/model.bin.tmp"),
    );
    assert_eq!(
        args,
        vec!["--data", "out/training_data.csv", "--output", "out/model.bin.tmp", "--label", "Churn"]
    );
}

#[test]
fn test_command_trainer_spawn_failure() {
    let dir = tempfile::tempdir().unwrap();
    let trainer = CommandTrainer::new(
        "driftloop-no-such-program",
        Vec::new(),
        dir.path().join("model.bin"),
        "Churn",
    );
    let err = trainer.train(&labeled(), None).unwrap_err();
    assert!(matches!(err, Error::Training { .. }));
    assert!(dir.path().join("training_data.csv").exists());
}

#[cfg(unix)]
#[test]
fn test_command_trainer_success_renames_model() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("model.bin");
    let trainer = CommandTrainer::new(
        "sh",
        vec!["-c".to_string(), "cp \"$0\" \"$1\"".to_string(), "{data}".to_string(), "{model}".to_string()],
        &model,
        "Churn",
    );

    let artifact = trainer.train(&labeled(), None).unwrap();
    assert_eq!(artifact.rows, 6);
    assert!(model.exists());
    assert!(!temp_path_for(&model).exists());
}

#[cfg(unix)]
#[test]
fn test_command_trainer_nonzero_exit_removes_temp() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("model.bin");
    let trainer = CommandTrainer::new(
        "sh",
        vec!["-c".to_string(), "touch \"$0\"; exit 3".to_string(), "{model}".to_string()],
        &model,
        "Churn",
    );

    let err = trainer.train(&labeled(), None).unwrap_err();
    assert!(matches!(err, Error::Training { .. }));
    assert!(!model.exists());
    assert!(!temp_path_for(&model).exists());
}

#[cfg(unix)]
#[test]
fn test_command_trainer_missing_output() {
    let dir = tempfile::tempdir().unwrap();
    let trainer =
        CommandTrainer::new("true", vec!["{data}".to_string()], dir.path().join("m.bin"), "Churn");
    let err = trainer.train(&labeled(), None).unwrap_err();
    assert!(err.to_string().contains("did not write a model"));
}

#[cfg(unix)]
#[test]
fn test_command_trainer_timeout_kills_child() {
    let dir = tempfile::tempdir().unwrap();
    let trainer =
        CommandTrainer::new("sleep", vec!["5".to_string()], dir.path().join("m.bin"), "Churn");
    let started = std::time::Instant::now();
    let err = trainer.train(&labeled(), Some(std::time::Duration::from_millis(200))).unwrap_err();
    assert!(err.to_string().contains("timeout"));
    assert!(started.elapsed() < std::time::Duration::from_secs(4));
}
