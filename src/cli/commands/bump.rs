//! Bump command: set a plugin's version and commit it.

use super::helpers::{npm_runner, open_repository};
use crate::EnvConfig;
use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::{GitError, Result};
use crate::git::{GitRepository, commit_message};
use crate::npm::NpmRunner;
use crate::plugin;
use crate::version::{parse_version, sanitize_version};

/// Options for a version bump
#[derive(Debug, Clone, Default)]
pub struct BumpOptions {
    /// Do not run `npm install` after writing the version
    pub skip_install: bool,
    /// Leave the change uncommitted
    pub skip_commit: bool,
    /// Allow a dirty working tree
    pub skip_git_check: bool,
}

/// Execute bump command
pub(super) fn execute_bump(args: &Args, config: &RuntimeConfig, env: &EnvConfig) -> Result<()> {
    let Command::Bump {
        plugin,
        version,
        skip_install,
        skip_commit,
        skip_git_check,
    } = &args.command
    else {
        unreachable!("execute_bump called with {}", args.command.name());
    };

    let options = BumpOptions {
        skip_install: *skip_install,
        skip_commit: *skip_commit,
        skip_git_check: *skip_git_check,
    };

    let git = open_repository()?;
    run_bump(&git, &npm_runner(env), config, plugin, version, &options).map(|_| ())
}

/// Bump `plugin` to `version`.
///
/// Returns the SHA of the bump commit, `None` when nothing was committed.
pub fn run_bump(
    git: &GitRepository,
    npm: &NpmRunner,
    config: &RuntimeConfig,
    plugin_name: &str,
    version: &str,
    options: &BumpOptions,
) -> Result<Option<String>> {
    let version = sanitize_version(version);
    parse_version(&version)?;

    let plugin_name = plugin_name.trim_end_matches('/');
    let plugin_dir = plugin::get_plugin_path(git.root(), plugin_name)?;

    if !options.skip_git_check && !git.is_working_tree_clean()? {
        return Err(GitError::DirtyWorkingDirectory.into());
    }

    config.section(&format!("Bumping {} to {}", plugin_name, version));

    let previous = plugin::set_plugin_version(&plugin_dir, &version)?;
    if previous == version {
        config.warning_println(&format!(
            "{} is already at version {}",
            plugin_name, version
        ));
    } else {
        config.success_println(&format!(
            "Updated package.json: {} → {}",
            previous, version
        ));
    }

    if options.skip_install {
        config.verbose_println("Skipping npm install");
    } else {
        config.println(&format!("📦 Running {} install...", npm.program()));
        match npm.install(&plugin_dir) {
            Ok(()) => config.success_println("Dependencies installed"),
            Err(e) => config.warning_println(&format!(
                "npm install failed, package-lock.json may be stale: {}",
                e
            )),
        }
    }

    if options.skip_commit {
        config.println("Leaving the change uncommitted (--skip-commit)");
        return Ok(None);
    }

    let commit = git.commit_plugin_version_change(&plugin_dir, plugin_name, &version)?;
    match &commit {
        Some(sha) => {
            config.success_println(&format!("Committed \"{}\"", commit_message(plugin_name, &version)));
            config.indent(&format!("commit {}", sha));
            config.println("Push the commit before running `releaser release`.");
        }
        None => config.warning_println("Nothing to commit, version files unchanged"),
    }

    Ok(commit)
}
