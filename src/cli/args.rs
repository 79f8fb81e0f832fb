//! Command line argument parsing and validation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Release tool for the plugins monorepo
#[derive(Parser, Debug)]
#[command(
    name = "releaser",
    version,
    about = "Bump, package and release plugins of the monorepo",
    long_about = "Bump, package and release plugins of the monorepo.

Typical flow:
  releaser bump my-plugin 1.2.0
  git push
  releaser package my-plugin
  releaser release my-plugin 1.2.0 --publish

GitHub commands need GITHUB_TOKEN (or GH_TOKEN) in the environment."
)]
pub struct Args {
    /// Command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Show detailed progress
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Releaser subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Set a plugin's version in package.json and commit it
    Bump {
        /// Plugin directory name
        plugin: String,

        /// New version (strict semver, a leading 'v' is stripped)
        version: String,

        /// Do not run `npm install` after the bump
        #[arg(long)]
        skip_install: bool,

        /// Leave the change uncommitted
        #[arg(long)]
        skip_commit: bool,

        /// Allow bumping with uncommitted changes in the working tree
        #[arg(long)]
        skip_git_check: bool,
    },

    /// Build the plugin tarball with `npm run package`
    Package {
        /// Plugin directory name
        plugin: String,

        /// Copy the tarball into this directory
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Create or update the GitHub release of a plugin
    Release {
        /// Plugin directory name
        plugin: String,

        /// Version to release; must match package.json (defaults to it)
        version: Option<String>,

        /// Tarball to upload instead of searching the plugin directory
        #[arg(long, value_name = "PATH", conflicts_with = "no_tarball")]
        tarball: Option<PathBuf>,

        /// Tag the release and publish it (otherwise it stays a draft)
        #[arg(long)]
        publish: bool,

        /// Create the release without uploading a tarball
        #[arg(long)]
        no_tarball: bool,

        /// Overwrite an already uploaded asset without asking
        #[arg(short = 'y', long)]
        yes: bool,

        /// Git remote to push tags to and read the repository from
        #[arg(long, env = "RELEASER_REMOTE", default_value = "origin")]
        remote: String,
    },
}

impl Command {
    /// Subcommand name for messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Bump { .. } => "bump",
            Command::Package { .. } => "package",
            Command::Release { .. } => "release",
        }
    }

    /// Plugin the command operates on
    pub fn plugin(&self) -> &str {
        match self {
            Command::Bump { plugin, .. }
            | Command::Package { plugin, .. }
            | Command::Release { plugin, .. } => plugin,
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        let plugin = self.command.plugin().trim_end_matches('/');
        if plugin.is_empty() {
            return Err("Plugin name is required".to_string());
        }
        if plugin.contains(['/', '\\']) || plugin == "." || plugin == ".." {
            return Err(format!(
                "Plugin '{}' must be a directory name at the repository root, not a path",
                plugin
            ));
        }
        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            output: super::OutputManager::new(verbose, quiet),
        }
    }

    /// Print message
    pub fn println(&self, message: &str) {
        self.output.println(message);
    }

    /// Print verbose message (only with --verbose)
    pub fn verbose_println(&self, message: &str) {
        self.output.verbose(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        self.output.success(message);
    }

    /// Print a section header
    pub fn section(&self, title: &str) {
        self.output.section(title);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        self.output.indent(message);
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.output.is_quiet()
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new(false, false)
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(args.verbose, args.quiet)
    }
}
