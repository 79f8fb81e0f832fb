//! System git backend for plugin releases.
//!
//! Every operation is one `git` subprocess run from the repository root.

use crate::error::{GitError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Handle on the plugins repository, driven through the `git` binary
#[derive(Debug, Clone)]
pub struct GitRepository {
    /// Working tree root as reported by `git rev-parse --show-toplevel`
    root: PathBuf,
}

/// Resolve the root of the repository containing the current directory
pub fn get_repo_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(GitRepository::discover(&cwd)?.root)
}

impl GitRepository {
    /// Open the repository that contains `path`
    pub fn discover(path: &Path) -> Result<Self> {
        which::which("git").map_err(|_| GitError::GitNotFound)?;

        let output = Command::new("git")
            .arg("-C")
            .arg(path)
            .args(["rev-parse", "--show-toplevel"])
            .output()?;

        if !output.status.success() {
            log::debug!(
                "rev-parse failed in {}: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Err(GitError::NotRepository.into());
        }

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Self {
            root: PathBuf::from(root),
        })
    }

    /// Working tree root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A `git` command rooted at the working tree
    pub(crate) fn git_cmd(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.root);
        // Never block on an editor or credential prompt.
        cmd.env("GIT_TERMINAL_PROMPT", "0").env("GIT_EDITOR", "true");
        cmd
    }

    /// Run git and return the raw output regardless of exit status
    pub(crate) fn output(&self, args: &[&str]) -> Result<Output> {
        log::debug!("git {}", args.join(" "));
        Ok(self.git_cmd().args(args).output()?)
    }

    /// Run git and return trimmed stdout, failing on a non-zero exit
    pub(crate) fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run git and report only whether it succeeded
    pub(crate) fn succeeds(&self, args: &[&str]) -> Result<bool> {
        Ok(self.output(args)?.status.success())
    }

    /// Path of `path` relative to the working tree, for use as a pathspec
    pub(crate) fn pathspec(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let spec = relative.to_string_lossy().replace('\\', "/");
        if spec.is_empty() { ".".to_string() } else { spec }
    }

    /// True iff tracked files have no staged or unstaged changes
    pub fn is_working_tree_clean(&self) -> Result<bool> {
        let status = self.run(&["status", "--porcelain", "--untracked-files=no"])?;
        Ok(status.is_empty())
    }

    /// Whether HEAD points at a commit (false in a freshly initialised repository)
    pub fn has_commits(&self) -> Result<bool> {
        self.succeeds(&["rev-parse", "-q", "--verify", "HEAD^{commit}"])
    }

    /// Full SHA of HEAD
    pub fn head_commit(&self) -> Result<String> {
        self.run(&["rev-parse", "HEAD"])
    }

    /// Fetch URL of a remote, `None` when the remote is not configured
    pub fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        let output = self.output(&["remote", "get-url", remote])?;
        if !output.status.success() {
            return Ok(None);
        }
        let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!url.is_empty()).then_some(url))
    }

    /// Stage the plugin manifest (and lockfile) and commit the version bump.
    ///
    /// The commit records only those files, whatever else is staged.
    ///
    /// Returns the new commit SHA, or `None` when the files were already at
    /// this version and there was nothing to commit.
    pub fn commit_plugin_version_change(
        &self,
        plugin_dir: &Path,
        plugin: &str,
        version: &str,
    ) -> Result<Option<String>> {
        let mut files = vec![self.pathspec(&plugin_dir.join("package.json"))];
        if plugin_dir.join("package-lock.json").is_file() {
            files.push(self.pathspec(&plugin_dir.join("package-lock.json")));
        }

        let mut add_args = vec!["add", "--"];
        add_args.extend(files.iter().map(String::as_str));
        self.run(&add_args).map_err(|e| GitError::CommitFailed {
            reason: format!("Failed to stage {}: {}", files.join(", "), e),
        })?;

        // Only the version files; other staged changes stay in the index.
        let mut diff_args = vec!["diff", "--cached", "--quiet", "--"];
        diff_args.extend(files.iter().map(String::as_str));
        if self.succeeds(&diff_args)? {
            log::warn!("Nothing staged for {} {}, skipping commit", plugin, version);
            return Ok(None);
        }

        let message = commit_message(plugin, version);
        let mut commit_args = vec!["commit", "--signoff", "-m", message.as_str(), "--"];
        commit_args.extend(files.iter().map(String::as_str));
        self.run(&commit_args)
            .map_err(|e| GitError::CommitFailed {
                reason: e.to_string(),
            })?;

        self.head_commit().map(Some)
    }

    /// Find the commit that set `version` in the plugin's package.json.
    ///
    /// Searches history for the exact `"version": "<version>"` string and
    /// falls back to the latest commit touching package.json.
    pub fn get_version_bump_commit(&self, plugin_dir: &Path, version: &str) -> Result<Option<String>> {
        if !self.has_commits()? {
            return Ok(None);
        }

        let manifest = self.pathspec(&plugin_dir.join("package.json"));
        let needle = format!("-S\"version\": \"{}\"", version);

        let exact = self.run(&["log", &needle, "--format=%H", "--", &manifest])?;
        if let Some(sha) = exact.lines().next() {
            return Ok(Some(sha.to_string()));
        }

        log::debug!(
            "No commit introduces version {} in {}, using latest commit touching it",
            version,
            manifest
        );
        let latest = self.run(&["log", "-1", "--format=%H", "--", &manifest])?;
        Ok(latest.lines().next().map(str::to_string))
    }

    /// Whether `sha` names a commit in the local object database
    pub fn validate_commit_sha(&self, sha: &str) -> Result<bool> {
        if sha.is_empty() || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(false);
        }
        self.succeeds(&["cat-file", "-e", &format!("{}^{{commit}}", sha)])
    }

    /// Whether a remote-tracking branch of `remote` already contains `sha`.
    ///
    /// The release API only accepts commits reachable on GitHub, so a commit
    /// that exists only locally cannot be used as `target_commitish`.
    pub fn is_commit_pushed_to_remote(&self, sha: &str, remote: &str) -> Result<bool> {
        if !self.validate_commit_sha(sha)? {
            return Ok(false);
        }

        let branches = self.run(&[
            "branch",
            "-r",
            "--contains",
            sha,
            "--format=%(refname:short)",
        ])?;
        let prefix = format!("{}/", remote);
        Ok(branches.lines().any(|b| b.trim().starts_with(&prefix)))
    }
}

/// Commit message used for version bumps
pub fn commit_message(plugin: &str, version: &str) -> String {
    format!("{}: Bump version to {}", plugin, version)
}
