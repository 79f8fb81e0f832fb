//! Command execution functions coordinating release operations.
//!
//! Each subcommand has an `execute_*` entry point that wires up the real
//! environment (repository root, npm, GitHub) and a `run_*` core that takes
//! those collaborators as arguments.

mod bump;
mod helpers;
mod package;
mod release;

pub use bump::{BumpOptions, run_bump};
pub use helpers::format_size;
pub use package::{PackageOptions, PackageOutcome, run_package};
pub use release::{OverwritePolicy, ReleaseOptions, ReleaseOutcome, run_release};

use crate::EnvConfig;
use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;

use bump::execute_bump;
use package::execute_package;
use release::execute_release;

/// Execute the main command based on parsed arguments
pub async fn execute_command(args: Args, env: &EnvConfig) -> Result<i32> {
    if let Err(validation_error) = args.validate() {
        // Validation errors are never quiet
        let output = super::OutputManager::new(false, false);
        output.error(&format!("Invalid arguments: {}", validation_error));
        return Ok(1);
    }

    let config = RuntimeConfig::from(&args);

    let result = match &args.command {
        Command::Bump { .. } => execute_bump(&args, &config, env),
        Command::Package { .. } => execute_package(&args, &config, env),
        Command::Release { .. } => execute_release(&args, &config, env).await,
    };

    match result {
        Ok(()) => Ok(0),
        Err(e) => {
            config.error_println(&format!(
                "Command '{}' failed: {}",
                args.command.name(),
                e
            ));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() && !config.is_quiet() {
                config.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    config.println(&format!("  • {}", suggestion));
                }
            }

            if e.is_precondition() {
                config.println("No changes were made.");
            }

            Ok(1)
        }
    }
}
