//! Package command: build a plugin tarball.

use super::helpers::{format_size, npm_runner, open_repository};
use crate::EnvConfig;
use crate::artifacthub::sha256_file;
use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::{PluginError, Result};
use crate::git::GitRepository;
use crate::npm::NpmRunner;
use crate::plugin;
use std::path::{Path, PathBuf};

/// npm script that produces the tarball
const PACKAGE_SCRIPT: &str = "package";

/// Options for packaging
#[derive(Debug, Clone, Default)]
pub struct PackageOptions {
    /// Copy the tarball here (created if missing)
    pub output_dir: Option<PathBuf>,
}

/// The tarball a package run produced
#[derive(Debug, Clone)]
pub struct PackageOutcome {
    /// Final location of the tarball
    pub tarball: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Lowercase hex SHA-256
    pub sha256: String,
}

/// Execute package command
pub(super) fn execute_package(args: &Args, config: &RuntimeConfig, env: &EnvConfig) -> Result<()> {
    let Command::Package { plugin, output_dir } = &args.command else {
        unreachable!("execute_package called with {}", args.command.name());
    };

    let options = PackageOptions {
        output_dir: output_dir.clone(),
    };

    let git = open_repository()?;
    run_package(&git, &npm_runner(env), config, plugin, &options).map(|_| ())
}

/// Run the plugin's `package` script and locate the tarball it produced
pub fn run_package(
    git: &GitRepository,
    npm: &NpmRunner,
    config: &RuntimeConfig,
    plugin_name: &str,
    options: &PackageOptions,
) -> Result<PackageOutcome> {
    let plugin_name = plugin_name.trim_end_matches('/');
    let plugin_dir = plugin::get_plugin_path(git.root(), plugin_name)?;
    let info = plugin::get_plugin_info(&plugin_dir)?;

    if !plugin::has_script(&plugin_dir, PACKAGE_SCRIPT)? {
        return Err(PluginError::MissingScript {
            plugin: plugin_name.to_string(),
            script: PACKAGE_SCRIPT.to_string(),
        }
        .into());
    }

    config.section(&format!("Packaging {} {}", info.name, info.version));
    config.println(&format!("📦 Running {} run {}...", npm.program(), PACKAGE_SCRIPT));
    npm.run_script(&plugin_dir, PACKAGE_SCRIPT)?;

    let built = plugin::find_tarball(&plugin_dir, &info.name, Some(&info.version))?.ok_or_else(
        || PluginError::TarballNotFound {
            plugin: plugin_name.to_string(),
            version: Some(info.version.clone()),
            path: plugin_dir.clone(),
        },
    )?;
    config.verbose_println(&format!("Built {}", built.display()));

    let tarball = match &options.output_dir {
        Some(dir) => copy_into(&built, dir)?,
        None => built,
    };

    let size = std::fs::metadata(&tarball)?.len();
    let sha256 = sha256_file(&tarball)?;

    config.success_println(&format!("Packaged {}", display_name(&tarball)));
    config.indent(&format!("Path:    {}", tarball.display()));
    config.indent(&format!("Size:    {}", format_size(size)));
    config.indent(&format!("SHA-256: {}", sha256));

    Ok(PackageOutcome {
        tarball,
        size,
        sha256,
    })
}

fn copy_into(tarball: &Path, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let destination = dir.join(tarball.file_name().unwrap_or(tarball.as_os_str()));
    std::fs::copy(tarball, &destination)?;
    log::info!("Copied {} to {}", tarball.display(), destination.display());
    Ok(destination)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
