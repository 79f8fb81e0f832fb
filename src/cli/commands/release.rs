//! Release command: create or update the GitHub release of a plugin.
//!
//! Every step checks remote state first, so re-running after a failure picks
//! up where the previous run stopped: an existing draft is reused, an
//! uploaded asset is only replaced after confirmation, and tags are created
//! and pushed only when missing.

use super::helpers::{open_repository, prompt_confirmation};
use crate::EnvConfig;
use crate::artifacthub::{ArtifactHubMetadata, sha256_file};
use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::{CliError, PluginError, Result};
use crate::git::{GitRepository, NO_CHANGES_SENTINEL, TagOutcome, plugin_tag_name};
use crate::github::{
    GitHubClient, GitHubReleaseManager, Release, ReleaseApi, ReleaseAsset, release_name,
    resolve_repo,
};
use crate::plugin::{self, contains_version};
use crate::version::{parse_version, sanitize_version};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// What to do when the release already carries an asset with the same name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwritePolicy {
    /// Ask on the terminal, defaulting to no
    Ask,
    /// Replace without asking (`--yes`)
    Always,
    /// Keep the existing asset
    Never,
}

/// Options for a release run
#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    /// Version requested on the command line; must match package.json
    pub version: Option<String>,
    /// Explicit tarball instead of searching the plugin directory
    pub tarball: Option<PathBuf>,
    /// Tag and publish after uploading
    pub publish: bool,
    /// Skip the tarball entirely
    pub no_tarball: bool,
    /// Remote tags are pushed to
    pub remote: String,
    /// Handling of an already uploaded asset
    pub overwrite: OverwritePolicy,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self {
            version: None,
            tarball: None,
            publish: false,
            no_tarball: false,
            remote: "origin".to_string(),
            overwrite: OverwritePolicy::Ask,
        }
    }
}

/// Result of a release run
#[derive(Debug, Clone)]
pub struct ReleaseOutcome {
    /// Release as GitHub last reported it
    pub release: Release,
    /// Tag `<plugin>-<version>`
    pub tag: String,
    /// Asset uploaded in this run, `None` when skipped
    pub uploaded: Option<ReleaseAsset>,
    /// Whether the ArtifactHub sidecar was rewritten
    pub metadata_updated: bool,
}

/// Execute release command
pub(super) async fn execute_release(
    args: &Args,
    config: &RuntimeConfig,
    env: &EnvConfig,
) -> Result<()> {
    let Command::Release {
        plugin,
        version,
        tarball,
        publish,
        no_tarball,
        yes,
        remote,
    } = &args.command
    else {
        unreachable!("execute_release called with {}", args.command.name());
    };

    let overwrite = if *yes {
        OverwritePolicy::Always
    } else if std::io::stdin().is_terminal() {
        OverwritePolicy::Ask
    } else {
        OverwritePolicy::Never
    };

    let options = ReleaseOptions {
        version: version.clone(),
        tarball: tarball.clone(),
        publish: *publish,
        no_tarball: *no_tarball,
        remote: remote.clone(),
        overwrite,
    };

    let git = open_repository()?;
    let repo = resolve_repo(env, &git, remote)?;
    config.verbose_println(&format!("Repository: {}", repo));
    let api = GitHubReleaseManager::new(GitHubClient::from_env(env, repo)?);

    run_release(&git, &api, config, plugin, &options)
        .await
        .map(|_| ())
}

/// Create or update the release of `plugin_name` and upload its tarball
pub async fn run_release<A: ReleaseApi>(
    git: &GitRepository,
    api: &A,
    config: &RuntimeConfig,
    plugin_name: &str,
    options: &ReleaseOptions,
) -> Result<ReleaseOutcome> {
    let plugin_name = plugin_name.trim_end_matches('/');
    let plugin_dir = plugin::get_plugin_path(git.root(), plugin_name)?;
    let info = plugin::get_plugin_info(&plugin_dir)?;

    let version = match &options.version {
        Some(requested) => {
            let requested = sanitize_version(requested);
            parse_version(&requested)?;
            if requested != info.version {
                return Err(CliError::VersionMismatch {
                    plugin: plugin_name.to_string(),
                    requested,
                    found: info.version,
                }
                .into());
            }
            requested
        }
        None => {
            parse_version(&info.version)?;
            info.version.clone()
        }
    };

    let tarball = resolve_tarball(&plugin_dir, &info.name, plugin_name, &version, options)?;
    if let Some(file_name) = tarball.as_deref().and_then(Path::file_name) {
        let file_name = file_name.to_string_lossy();
        if !contains_version(&file_name, &version) {
            config.warning_println(&format!(
                "Tarball {} is not built for version {}",
                file_name, version
            ));
        }
    }

    let tag = plugin_tag_name(plugin_name, &version);
    let name = release_name(plugin_name, &version);
    config.section(&format!("Releasing {}", name));

    let changelog = git.get_changelog_for_plugin(plugin_name, &plugin_dir, Some(&version))?;
    if changelog == NO_CHANGES_SENTINEL {
        config.warning_println(&format!("No commits touch {} since its last release", plugin_name));
    } else {
        config.println("Changelog:");
        config.indent(&changelog);
    }

    let bump_commit = git.get_version_bump_commit(&plugin_dir, &version)?;

    config.println("🔍 Looking for an existing release...");
    let existing = match api.get_release(&tag).await? {
        Some(release) => Some(release),
        None => api.get_release_by_name(&name).await?,
    };

    let mut release = match existing {
        Some(release) => {
            config.println(&format!(
                "Found {} release: {}",
                if release.draft { "draft" } else { "published" },
                release.html_url
            ));
            release
        }
        None => {
            let target = pinned_target(git, bump_commit.as_deref(), &options.remote, config)?;
            let release = api
                .create_draft_release(plugin_name, &version, &changelog, target.as_deref())
                .await?;
            config.success_println(&format!("Created draft release {}", name));
            release
        }
    };

    let mut uploaded = None;
    let mut metadata_updated = false;
    if let Some(tarball) = &tarball {
        let asset_name = tarball
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let replace = match release.asset_named(&asset_name) {
            Some(asset) => {
                if confirm_overwrite(options.overwrite, &asset_name, config)? {
                    api.delete_asset(asset.id).await?;
                    config.verbose_println(&format!("Deleted previous asset {}", asset_name));
                    true
                } else {
                    config.warning_println(&format!(
                        "Keeping the existing {} on the release",
                        asset_name
                    ));
                    false
                }
            }
            None => true,
        };

        if replace {
            config.println(&format!("⬆️  Uploading {}...", asset_name));
            let asset = api.upload_asset(&release, tarball, Some(&asset_name)).await?;
            config.success_println(&format!("Uploaded {}", asset.name));
            release.assets.retain(|a| a.name != asset.name);
            release.assets.push(asset.clone());
            uploaded = Some(asset);

            let url = api.repo().download_url(&tag, &asset_name);
            metadata_updated = update_metadata(&plugin_dir, &version, &url, tarball, config)?;
        }
    } else {
        config.verbose_println("Releasing without a tarball (--no-tarball)");
    }

    if options.publish {
        let target = bump_commit.as_deref();
        if git.create_tag_if_not_exists(plugin_name, &version, target)? == TagOutcome::Created {
            config.success_println(&format!("Created tag {}", tag));
        }
        if git.push_tag_if_not_on_remote(&tag, &options.remote)? == TagOutcome::Created {
            config.success_println(&format!("Pushed tag {} to {}", tag, options.remote));
        }

        if release.draft {
            release = api.publish_release(release.id).await?;
            config.success_println(&format!("Published {}", name));
        } else {
            config.println("Release is already published");
        }
    } else if release.draft {
        config.println("Release left as a draft; re-run with --publish to publish it");
    }

    config.println(&format!("🔗 {}", release.html_url));

    Ok(ReleaseOutcome {
        release,
        tag,
        uploaded,
        metadata_updated,
    })
}

/// Tarball to upload, `None` with `--no-tarball`
fn resolve_tarball(
    plugin_dir: &Path,
    package_name: &str,
    plugin_name: &str,
    version: &str,
    options: &ReleaseOptions,
) -> Result<Option<PathBuf>> {
    if options.no_tarball {
        return Ok(None);
    }

    let tarball = match &options.tarball {
        Some(path) if path.is_file() => path.clone(),
        Some(path) => {
            return Err(PluginError::TarballNotFound {
                plugin: plugin_name.to_string(),
                version: Some(version.to_string()),
                path: path.clone(),
            }
            .into());
        }
        None => plugin::find_tarball(plugin_dir, package_name, Some(version))?.ok_or_else(|| {
            PluginError::TarballNotFound {
                plugin: plugin_name.to_string(),
                version: Some(version.to_string()),
                path: plugin_dir.to_path_buf(),
            }
        })?,
    };

    Ok(Some(tarball))
}

/// Bump commit to pin a new draft to, when GitHub can see it
fn pinned_target(
    git: &GitRepository,
    bump_commit: Option<&str>,
    remote: &str,
    config: &RuntimeConfig,
) -> Result<Option<String>> {
    let Some(sha) = bump_commit else {
        config.verbose_println("No version bump commit found, release will target the default branch");
        return Ok(None);
    };

    if git.is_commit_pushed_to_remote(sha, remote)? {
        config.verbose_println(&format!("Pinning release to {}", sha));
        Ok(Some(sha.to_string()))
    } else {
        config.warning_println(&format!(
            "Version bump commit {} is not on {} yet, release will target the default branch",
            sha, remote
        ));
        Ok(None)
    }
}

fn confirm_overwrite(policy: OverwritePolicy, asset_name: &str, config: &RuntimeConfig) -> Result<bool> {
    match policy {
        OverwritePolicy::Always => Ok(true),
        OverwritePolicy::Never => {
            config.warning_println(&format!(
                "{} is already uploaded and stdin is not a terminal; pass --yes to replace it",
                asset_name
            ));
            Ok(false)
        }
        OverwritePolicy::Ask => Ok(prompt_confirmation(&format!(
            "{} is already uploaded. Replace it?",
            asset_name
        ))?),
    }
}

fn update_metadata(
    plugin_dir: &Path,
    version: &str,
    archive_url: &str,
    tarball: &Path,
    config: &RuntimeConfig,
) -> Result<bool> {
    let Some(mut metadata) = ArtifactHubMetadata::load(plugin_dir)? else {
        config.verbose_println("No artifacthub-pkg.yml, skipping metadata update");
        return Ok(false);
    };

    let checksum = sha256_file(tarball)?;
    metadata.update_release(version, archive_url, &checksum);
    metadata.save()?;

    config.success_println(&format!("Updated {}", metadata.path().display()));
    config.println("Commit artifacthub-pkg.yml so ArtifactHub picks up the new archive.");
    Ok(true)
}
