//! Command-line front end: dispatch plus console output helpers.

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::{log, LogLevel};

pub use crate::config::Cli;
