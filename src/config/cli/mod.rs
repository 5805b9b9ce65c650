//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! driftloop evaluate
//! driftloop run -c driftloop.yaml
//! driftloop auto-resolve --max-iterations 5 --seed 42
//! driftloop split raw.csv --sort-by tenure
//! ```

mod core;
mod types;

pub use core::{
    apply_overrides, parse_args, AutoResolveArgs, Cli, Command, RunArgs, SplitArgs,
};
pub use types::OutputFormat;
