//! Pipeline configuration: YAML schema, validation, and CLI arguments.

mod cli;
mod schema;
mod validate;

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

pub use cli::{
    apply_overrides, parse_args, AutoResolveArgs, Cli, Command, OutputFormat, RunArgs, SplitArgs,
};
pub use schema::{
    DataConfig, DriftConfig, PipelineConfig, ReportConfig, RetrainConfig, TimelineConfig,
    TrainerConfig, TrainerKind,
};
pub use validate::{validate_config, ValidationError};

/// Load and validate a pipeline configuration.
///
/// A missing file yields the defaults; an unreadable or malformed one is an
/// error.
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<PipelineConfig> {
    let path = config_path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "config file not found; using defaults");
        return Ok(PipelineConfig::default());
    }

    let yaml_content = fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {e}", path.display()))
    })?;
    let config = parse_config(&yaml_content)?;
    Ok(config)
}

/// Parse and validate YAML text.
pub fn parse_config(yaml: &str) -> Result<PipelineConfig> {
    let config: PipelineConfig = if yaml.trim().is_empty() {
        PipelineConfig::default()
    } else {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::Config(format!("Failed to parse YAML config: {e}")))?
    };
    validate_config(&config).map_err(|e| Error::Config(format!("Invalid config: {e}")))?;
    Ok(config)
}
