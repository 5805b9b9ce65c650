//! External-command trainer.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::artifact::{temp_path_for, ModelArtifact};
use super::Trainer;
use crate::dataset::{write_csv, Dataset};
use crate::error::{Error, Result};

/// Argument template used when none is configured
pub const DEFAULT_COMMAND_ARGS: [&str; 6] =
    ["--data", "{data}", "--output", "{model}", "--label", "{label}"];

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs a training program against a CSV export of the training data.
///
/// Arguments may contain `{data}`, `{model}` and `{label}` placeholders. The
/// program receives `<model>.tmp` as `{model}`; the file is renamed to the
/// final path after a zero exit status. Program stderr is captured in
/// `trainer.log` next to the model.
#[derive(Clone, Debug)]
pub struct CommandTrainer {
    program: String,
    args: Vec<String>,
    model_path: PathBuf,
    label: String,
}

impl CommandTrainer {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        model_path: impl Into<PathBuf>,
        label: impl Into<String>,
    ) -> Self {
        let args = if args.is_empty() {
            DEFAULT_COMMAND_ARGS.iter().map(|s| s.to_string()).collect()
        } else {
            args
        };
        Self { program: program.into(), args, model_path: model_path.into(), label: label.into() }
    }

    fn model_dir(&self) -> PathBuf {
        self.model_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Arguments with placeholders substituted.
    pub fn render_args(&self, data: &Path, model: &Path) -> Vec<String> {
        self.args
            .iter()
            .map(|a| {
                a.replace("{data}", &data.to_string_lossy())
                    .replace("{model}", &model.to_string_lossy())
                    .replace("{label}", &self.label)
            })
            .collect()
    }

    fn run(&self, data_path: &Path, tmp_model: &Path, timeout: Option<Duration>) -> Result<()> {
        let log_path = self.model_dir().join("trainer.log");
        let log = File::create(&log_path)
            .map_err(|e| Error::io(format!("creating {}", log_path.display()), e))?;

        let args = self.render_args(data_path, tmp_model);
        debug!(program = %self.program, ?args, "spawning trainer");
        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(log))
            .spawn()
            .map_err(|e| Error::training(format!("failed to start '{}': {e}", self.program)))?;

        let status = match timeout {
            Some(limit) => wait_with_timeout(&mut child, limit)?,
            None => child
                .wait()
                .map_err(|e| Error::training(format!("waiting for '{}': {e}", self.program)))?,
        };

        if !status.success() {
            return Err(Error::training(format!(
                "'{}' exited with {status} (see {})",
                self.program,
                log_path.display()
            )));
        }
        if !tmp_model.exists() {
            return Err(Error::training(format!(
                "'{}' did not write a model to {}",
                self.program,
                tmp_model.display()
            )));
        }
        Ok(())
    }
}

impl Trainer for CommandTrainer {
    fn train(&self, data: &Dataset, timeout: Option<Duration>) -> Result<ModelArtifact> {
        let data_path = self.model_dir().join("training_data.csv");
        write_csv(&data_path, data)?;

        let tmp_model = temp_path_for(&self.model_path);
        info!(program = %self.program, rows = data.n_rows(), "training with external command");
        if let Err(e) = self.run(&data_path, &tmp_model, timeout) {
            if tmp_model.exists() {
                if let Err(rm) = std::fs::remove_file(&tmp_model) {
                    warn!(path = %tmp_model.display(), error = %rm, "could not remove partial model");
                }
            }
            return Err(e);
        }

        std::fs::rename(&tmp_model, &self.model_path)
            .map_err(|e| Error::io(format!("moving model to {}", self.model_path.display()), e))?;
        Ok(ModelArtifact::new(&self.model_path, data.n_rows(), self.name()))
    }

    fn name(&self) -> &str {
        "command"
    }
}

/// Poll `child` until it exits, killing it once `timeout` has elapsed.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<ExitStatus> {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if start.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(Error::training(format!(
                        "trainer killed after {}s timeout",
                        timeout.as_secs_f64()
                    )));
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => return Err(Error::training(format!("trainer process error: {e}"))),
        }
    }
}
