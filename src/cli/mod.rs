//! Command line interface for the releaser.
//!
//! Argument parsing, command dispatch and operator-facing output.

mod args;
pub mod commands;
mod output;

pub use args::{Args, Command, RuntimeConfig};
pub use commands::execute_command;
pub use output::OutputManager;

use crate::EnvConfig;
use crate::error::Result;

/// Main CLI entry point
pub async fn run(env: &EnvConfig) -> Result<i32> {
    let args = Args::parse_args();
    execute_command(args, env).await
}
