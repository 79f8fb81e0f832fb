//! Tests for the `releaser` binary: argument handling and exit codes

use crate::helpers::{TestRepo, package_version};
use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;

fn releaser(repo: &TestRepo) -> Result<Command> {
    let mut cmd = Command::cargo_bin("releaser")?;
    cmd.current_dir(&repo.path)
        .env_remove("GITHUB_TOKEN")
        .env_remove("GH_TOKEN")
        .env_remove("GITHUB_REPOSITORY")
        .env_remove("RELEASER_REMOTE")
        .env("RELEASER_NPM", "true");
    Ok(cmd)
}

#[test]
fn test_help_lists_subcommands() -> Result<()> {
    let repo = TestRepo::new()?;
    releaser(&repo)?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("bump"))
        .stdout(predicate::str::contains("package"))
        .stdout(predicate::str::contains("release"));
    Ok(())
}

#[test]
fn test_bump_invalid_version_exits_nonzero() -> Result<()> {
    let repo = TestRepo::new()?;
    let dir = repo.add_plugin("flux", "0.1.0")?;
    repo.commit("flux: Add plugin")?;

    releaser(&repo)?
        .args(["bump", "flux", "1.2"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid version '1.2'"))
        .stdout(predicate::str::contains("No changes were made"));

    assert_eq!(package_version(&dir)?, "0.1.0");
    Ok(())
}

#[test]
fn test_bump_end_to_end() -> Result<()> {
    let repo = TestRepo::new()?;
    let dir = repo.add_plugin("flux", "0.1.0")?;
    repo.commit("flux: Add plugin")?;

    releaser(&repo)?
        .args(["bump", "flux", "v0.2.0"])
        .assert()
        .success();

    assert_eq!(package_version(&dir)?, "0.2.0");
    assert_eq!(
        repo.stdout(&["log", "-1", "--format=%s"])?,
        "flux: Bump version to 0.2.0"
    );
    Ok(())
}

#[test]
fn test_release_without_token_fails_before_changes() -> Result<()> {
    let repo = TestRepo::new()?;
    let dir = repo.add_plugin("flux", "0.2.0")?;
    repo.commit("flux: Add plugin")?;
    std::fs::write(dir.join("flux-0.2.0.tgz"), b"archive")?;

    releaser(&repo)?
        .args(["release", "flux", "--publish"])
        .env("GITHUB_REPOSITORY", "octo/plugins")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("GITHUB_TOKEN"));

    assert!(repo.stdout(&["tag", "--list"])?.is_empty());
    Ok(())
}

#[test]
fn test_plugin_paths_are_rejected() -> Result<()> {
    let repo = TestRepo::new()?;
    releaser(&repo)?
        .args(["package", "../outside"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid arguments"));
    Ok(())
}

#[test]
fn test_conflicting_tarball_flags_are_usage_errors() -> Result<()> {
    let repo = TestRepo::new()?;
    releaser(&repo)?
        .args(["release", "flux", "--tarball", "flux.tgz", "--no-tarball"])
        .assert()
        .code(2);
    Ok(())
}
