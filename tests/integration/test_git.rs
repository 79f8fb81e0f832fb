//! Integration tests for the git layer against real repositories

use crate::helpers::TestRepo;
use anyhow::Result;
use plugin_releaser::git::{NO_CHANGES_SENTINEL, TagOutcome, plugin_tag_name};

#[test]
fn test_tag_lifecycle_is_idempotent() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.add_plugin("flux", "0.2.0")?;
    repo.commit("flux: Add plugin")?;
    let git = repo.repository()?;

    let tag = plugin_tag_name("flux", "0.2.0");
    assert_eq!(tag, "flux-0.2.0");

    assert_eq!(
        git.create_tag_if_not_exists("flux", "0.2.0", None)?,
        TagOutcome::Created
    );
    assert_eq!(
        git.create_tag_if_not_exists("flux", "0.2.0", None)?,
        TagOutcome::Skipped
    );
    assert!(git.tag_exists_locally(&tag)?);

    assert!(!git.tag_exists_on_remote(&tag, "origin")?);
    assert_eq!(git.push_tag_if_not_on_remote(&tag, "origin")?, TagOutcome::Created);
    assert_eq!(git.push_tag_if_not_on_remote(&tag, "origin")?, TagOutcome::Skipped);
    assert!(git.tag_exists_on_remote(&tag, "origin")?);

    let message = repo.stdout(&["tag", "-l", "--format=%(contents:subject)", &tag])?;
    assert_eq!(message, "flux v0.2.0");
    assert!(!repo.remote_stdout(&["tag", "--list", "flux-0.2.0"])?.is_empty());
    Ok(())
}

#[test]
fn test_tag_targets_given_commit() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.add_plugin("flux", "0.2.0")?;
    let first = repo.commit("flux: Add plugin")?;
    repo.write("flux/index.tsx", "// changed\n")?;
    repo.commit("flux: Change entry point")?;

    let git = repo.repository()?;
    git.create_tag_if_not_exists("flux", "0.2.0", Some(&first))?;

    assert_eq!(repo.stdout(&["rev-list", "-n", "1", "flux-0.2.0"])?, first);
    Ok(())
}

#[test]
fn test_latest_plugin_tag_uses_semver_order() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.add_plugin("foo", "1.0.0")?;
    repo.commit("foo: Add plugin")?;
    for tag in ["foo-1.0.0", "foo-1.10.0", "foo-1.9.0", "foo-bar-2.0.0"] {
        crate::helpers::git(&repo.path, &["tag", tag])?;
    }

    let git = repo.repository()?;
    assert_eq!(git.get_latest_plugin_tag("foo", None)?.as_deref(), Some("foo-1.10.0"));
    assert_eq!(git.get_latest_plugin_tag("foo-bar", None)?.as_deref(), Some("foo-bar-2.0.0"));
    assert_eq!(git.get_latest_plugin_tag("baz", None)?, None);

    // Bounded by the version being released
    assert_eq!(git.get_latest_plugin_tag("foo", Some("1.10.0"))?.as_deref(), Some("foo-1.9.0"));
    assert_eq!(git.get_latest_plugin_tag("foo", Some("1.0.0"))?, None);
    Ok(())
}

#[test]
fn test_changelog_without_prior_tag_lists_plugin_history() -> Result<()> {
    let repo = TestRepo::new()?;
    let dir = repo.add_plugin("flux", "0.1.0")?;
    repo.commit("flux: Add plugin")?;
    repo.add_plugin("other", "1.0.0")?;
    repo.commit("other: Add plugin")?;
    repo.write("flux/index.tsx", "// v2\n")?;
    repo.commit("flux: Show reconciliation status")?;

    let changelog = repo.repository()?.get_changelog_for_plugin("flux", &dir, None)?;
    let lines: Vec<&str> = changelog.lines().collect();

    assert_eq!(lines.len(), 2, "unexpected changelog:\n{}", changelog);
    assert!(lines[0].starts_with("- flux: Show reconciliation status ("));
    assert!(lines[1].starts_with("- flux: Add plugin ("));
    assert!(!changelog.contains("other"));
    Ok(())
}

#[test]
fn test_changelog_since_prior_tag() -> Result<()> {
    let repo = TestRepo::new()?;
    let dir = repo.add_plugin("flux", "0.1.0")?;
    repo.commit("flux: Add plugin")?;
    crate::helpers::git(&repo.path, &["tag", "flux-0.1.0"])?;

    let git = repo.repository()?;
    assert_eq!(git.get_changelog_for_plugin("flux", &dir, None)?, NO_CHANGES_SENTINEL);

    repo.write("flux/index.tsx", "// fixed\n")?;
    repo.commit("flux: Fix crash on empty namespace")?;

    let changelog = git.get_changelog_for_plugin("flux", &dir, None)?;
    assert_eq!(changelog.lines().count(), 1);
    assert!(changelog.contains("flux: Fix crash on empty namespace"));
    assert!(!changelog.contains("Add plugin"));
    Ok(())
}

#[test]
fn test_changelog_ignores_tag_of_released_version() -> Result<()> {
    let repo = TestRepo::new()?;
    let dir = repo.add_plugin("flux", "0.1.0")?;
    repo.commit("flux: Add plugin")?;
    crate::helpers::git(&repo.path, &["tag", "flux-0.1.0"])?;
    repo.write("flux/index.tsx", "// 0.2.0\n")?;
    repo.commit("flux: Add sources view")?;
    // The release tag already exists, e.g. when a deleted draft is recreated
    crate::helpers::git(&repo.path, &["tag", "flux-0.2.0"])?;

    let git = repo.repository()?;
    let changelog = git.get_changelog_for_plugin("flux", &dir, Some("0.2.0"))?;
    assert_eq!(changelog.lines().count(), 1, "unexpected changelog:\n{}", changelog);
    assert!(changelog.contains("flux: Add sources view"));

    assert_eq!(git.get_changelog_for_plugin("flux", &dir, None)?, NO_CHANGES_SENTINEL);
    Ok(())
}

#[test]
fn test_version_bump_commit_lookup() -> Result<()> {
    let repo = TestRepo::new()?;
    let dir = repo.add_plugin("flux", "1.0.0")?;
    repo.commit("flux: Add plugin")?;
    let git = repo.repository()?;

    plugin_releaser::plugin::set_plugin_version(&dir, "1.1.0")?;
    let bump = git
        .commit_plugin_version_change(&dir, "flux", "1.1.0")?
        .expect("version change is committed");

    // A later commit touching package.json without changing the version
    let manifest = std::fs::read_to_string(dir.join("package.json"))?;
    repo.write("flux/package.json", &manifest.replace("headlamp-plugin package", "headlamp-plugin package --quiet"))?;
    repo.commit("flux: Quieter packaging")?;

    assert_eq!(git.get_version_bump_commit(&dir, "1.1.0")?.as_deref(), Some(bump.as_str()));

    // Unknown version falls back to the latest commit touching package.json
    let head = repo.head()?;
    assert_eq!(git.get_version_bump_commit(&dir, "9.9.9")?.as_deref(), Some(head.as_str()));
    Ok(())
}

#[test]
fn test_version_commit_leaves_other_staged_files() -> Result<()> {
    let repo = TestRepo::new()?;
    let dir = repo.add_plugin("flux", "1.0.0")?;
    repo.commit("flux: Add plugin")?;
    repo.write("other/x.txt", "unrelated\n")?;
    crate::helpers::git(&repo.path, &["add", "other/x.txt"])?;
    let git = repo.repository()?;

    plugin_releaser::plugin::set_plugin_version(&dir, "1.1.0")?;
    git.commit_plugin_version_change(&dir, "flux", "1.1.0")?
        .expect("version change is committed");

    let committed = repo.stdout(&["show", "--name-only", "--format=", "HEAD"])?;
    assert_eq!(committed, "flux/package.json");
    assert_eq!(repo.stdout(&["diff", "--cached", "--name-only"])?, "other/x.txt");
    Ok(())
}

#[test]
fn test_commit_without_changes_is_skipped() -> Result<()> {
    let repo = TestRepo::new()?;
    let dir = repo.add_plugin("flux", "1.0.0")?;
    repo.commit("flux: Add plugin")?;
    let git = repo.repository()?;

    let before = repo.head()?;
    assert_eq!(git.commit_plugin_version_change(&dir, "flux", "1.0.0")?, None);
    assert_eq!(repo.head()?, before);
    Ok(())
}

#[test]
fn test_push_detection_follows_remote_tracking_branch() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.add_plugin("flux", "1.0.0")?;
    let sha = repo.commit("flux: Add plugin")?;
    let git = repo.repository()?;

    assert!(git.validate_commit_sha(&sha)?);
    assert!(!git.validate_commit_sha("not-a-sha")?);
    assert!(!git.is_commit_pushed_to_remote(&sha, "origin")?);

    repo.push()?;
    assert!(git.is_commit_pushed_to_remote(&sha, "origin")?);
    assert!(!git.is_commit_pushed_to_remote(&sha, "upstream")?);
    Ok(())
}

#[test]
fn test_working_tree_cleanliness() -> Result<()> {
    let repo = TestRepo::new()?;
    let git = repo.repository()?;
    assert!(git.is_working_tree_clean()?);

    // Untracked files do not count
    repo.write("scratch.txt", "notes\n")?;
    assert!(git.is_working_tree_clean()?);

    repo.write("README.md", "# Changed\n")?;
    assert!(!git.is_working_tree_clean()?);
    Ok(())
}
