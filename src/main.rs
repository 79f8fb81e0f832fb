//! Plugin releaser - bump, package and publish plugins of the monorepo.
//!
//! This binary drives the release workflow: version bumps committed to git,
//! tarballs built with npm, and GitHub releases kept in sync with the
//! ArtifactHub metadata.

use plugin_releaser::EnvConfig;
use plugin_releaser::cli;
use plugin_releaser::cli::OutputManager;
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let env = EnvConfig::from_process();

    match cli::run(&env).await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            // Create output manager for error display (never quiet for fatal errors)
            let output = OutputManager::new(false, false);
            output.error(&format!("Fatal error: {e}"));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                output.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    output.indent(&suggestion);
                }
            }

            process::exit(1);
        }
    }
}
