//! End-to-end tests for the bump and package commands

use crate::helpers::{TestRepo, package_version};
use anyhow::Result;
use plugin_releaser::ReleaseError;
use plugin_releaser::cli::RuntimeConfig;
use plugin_releaser::cli::commands::{BumpOptions, PackageOptions, run_bump, run_package};
use plugin_releaser::error::{GitError, PluginError, VersionError};
use plugin_releaser::npm::NpmRunner;

fn quiet() -> RuntimeConfig {
    RuntimeConfig::new(false, true)
}

/// npm stand-in that accepts every invocation
fn stub_npm() -> NpmRunner {
    NpmRunner::new("true")
}

#[test]
fn test_bump_commits_version_change() -> Result<()> {
    let repo = TestRepo::new()?;
    let dir = repo.add_plugin("my-plugin", "1.1.0")?;
    repo.commit("my-plugin: Add plugin")?;
    let git = repo.repository()?;

    let sha = run_bump(&git, &stub_npm(), &quiet(), "my-plugin", "v1.2.0", &BumpOptions::default())?
        .expect("bump is committed");

    assert_eq!(sha, repo.head()?);
    assert_eq!(package_version(&dir)?, "1.2.0");
    assert_eq!(
        repo.stdout(&["log", "-1", "--format=%s"])?,
        "my-plugin: Bump version to 1.2.0"
    );
    assert!(repo.stdout(&["log", "-1", "--format=%b"])?.contains("Signed-off-by: Test User"));
    assert!(git.is_working_tree_clean()?);
    Ok(())
}

#[test]
fn test_bump_is_idempotent() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.add_plugin("my-plugin", "1.2.0")?;
    repo.commit("my-plugin: Add plugin")?;
    let git = repo.repository()?;
    let before = repo.head()?;

    let commit = run_bump(&git, &stub_npm(), &quiet(), "my-plugin", "1.2.0", &BumpOptions::default())?;

    assert_eq!(commit, None);
    assert_eq!(repo.head()?, before);
    Ok(())
}

#[test]
fn test_bump_refuses_dirty_tree() -> Result<()> {
    let repo = TestRepo::new()?;
    let dir = repo.add_plugin("my-plugin", "1.1.0")?;
    repo.commit("my-plugin: Add plugin")?;
    repo.write("my-plugin/index.tsx", "// work in progress\n")?;
    let git = repo.repository()?;

    let err = run_bump(&git, &stub_npm(), &quiet(), "my-plugin", "1.2.0", &BumpOptions::default())
        .expect_err("dirty tree");
    assert!(matches!(err, ReleaseError::Git(GitError::DirtyWorkingDirectory)));
    assert!(err.is_precondition());
    assert_eq!(package_version(&dir)?, "1.1.0");

    let options = BumpOptions {
        skip_git_check: true,
        skip_commit: true,
        ..BumpOptions::default()
    };
    let before = repo.head()?;
    assert_eq!(run_bump(&git, &stub_npm(), &quiet(), "my-plugin", "1.2.0", &options)?, None);
    assert_eq!(package_version(&dir)?, "1.2.0");
    assert_eq!(repo.head()?, before);
    Ok(())
}

#[test]
fn test_bump_rejects_invalid_version_before_writing() -> Result<()> {
    let repo = TestRepo::new()?;
    let dir = repo.add_plugin("my-plugin", "1.1.0")?;
    repo.commit("my-plugin: Add plugin")?;
    let git = repo.repository()?;

    for bad in ["1.2", "1.2.3.4", "latest"] {
        let err = run_bump(&git, &stub_npm(), &quiet(), "my-plugin", bad, &BumpOptions::default())
            .expect_err("invalid version");
        assert!(matches!(err, ReleaseError::Version(VersionError::InvalidVersion { .. })));
    }
    assert_eq!(package_version(&dir)?, "1.1.0");
    Ok(())
}

#[test]
fn test_bump_survives_failing_install() -> Result<()> {
    let repo = TestRepo::new()?;
    let dir = repo.add_plugin("my-plugin", "1.1.0")?;
    repo.commit("my-plugin: Add plugin")?;
    let git = repo.repository()?;

    let commit = run_bump(
        &git,
        &NpmRunner::new("false"),
        &quiet(),
        "my-plugin",
        "1.2.0",
        &BumpOptions::default(),
    )?;

    assert!(commit.is_some());
    assert_eq!(package_version(&dir)?, "1.2.0");
    Ok(())
}

#[test]
fn test_package_requires_script() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.write("bare/package.json", "{\n  \"name\": \"bare\",\n  \"version\": \"1.0.0\"\n}\n")?;
    let git = repo.repository()?;

    let err = run_package(&git, &stub_npm(), &quiet(), "bare", &PackageOptions::default())
        .expect_err("no package script");
    assert!(matches!(err, ReleaseError::Plugin(PluginError::MissingScript { .. })));
    Ok(())
}

#[test]
fn test_package_finds_and_copies_tarball() -> Result<()> {
    let repo = TestRepo::new()?;
    let dir = repo.add_plugin("flux", "0.2.0")?;
    // The stub npm builds nothing, so the tarball is already in place
    std::fs::write(dir.join("flux-0.1.0.tgz"), b"previous")?;
    std::fs::write(dir.join("flux-0.2.0.tgz"), b"current")?;
    let git = repo.repository()?;

    let out = repo.path.join("dist");
    let outcome = run_package(
        &git,
        &stub_npm(),
        &quiet(),
        "flux",
        &PackageOptions {
            output_dir: Some(out.clone()),
        },
    )?;

    assert_eq!(outcome.tarball, out.join("flux-0.2.0.tgz"));
    assert_eq!(outcome.size, 7);
    assert_eq!(
        outcome.sha256,
        plugin_releaser::artifacthub::sha256_file(&dir.join("flux-0.2.0.tgz"))?
    );
    Ok(())
}

#[test]
fn test_package_without_tarball_fails() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.add_plugin("flux", "0.2.0")?;
    let git = repo.repository()?;

    let err = run_package(&git, &stub_npm(), &quiet(), "flux", &PackageOptions::default())
        .expect_err("nothing was built");
    assert!(matches!(err, ReleaseError::Plugin(PluginError::TarballNotFound { .. })));
    Ok(())
}
