//! Error types for releaser operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for releaser operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all releaser operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Version validation errors
    #[error("Version error: {0}")]
    Version(#[from] VersionError),

    /// Git operation errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// GitHub API errors
    #[error("GitHub error: {0}")]
    GitHub(#[from] GitHubError),

    /// Plugin resolution errors
    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),

    /// npm subprocess errors
    #[error("npm error: {0}")]
    Npm(#[from] NpmError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Version validation errors
#[derive(Error, Debug)]
pub enum VersionError {
    /// Version is not strict semver
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion {
        /// Version string
        version: String,
        /// Reason for the error
        reason: String,
    },
}

/// Git operation errors
#[derive(Error, Debug)]
pub enum GitError {
    /// Not a git repository
    #[error("Not a git repository. Run the releaser from inside the plugins repository.")]
    NotRepository,

    /// git binary missing from PATH
    #[error("git executable not found in PATH")]
    GitNotFound,

    /// Working directory not clean
    #[error("Working directory not clean. Please commit or stash changes before bumping.")]
    DirtyWorkingDirectory,

    /// A git subprocess exited unsuccessfully
    #[error("git {command} failed: {stderr}")]
    CommandFailed {
        /// Arguments passed to git
        command: String,
        /// Captured standard error
        stderr: String,
    },

    /// Commit failed
    #[error("Git commit failed: {reason}")]
    CommitFailed {
        /// Reason for the error
        reason: String,
    },

    /// Push failed
    #[error("Git push of '{reference}' failed: {reason}")]
    PushFailed {
        /// Reference being pushed
        reference: String,
        /// Reason for the error
        reason: String,
    },
}

/// GitHub API errors
#[derive(Error, Debug)]
pub enum GitHubError {
    /// No token in the environment
    #[error("GitHub token not provided. Set GITHUB_TOKEN (or GH_TOKEN).")]
    MissingToken,

    /// Could not determine owner/repo
    #[error("Could not determine GitHub repository: {reason}")]
    RepositoryUnknown {
        /// Reason for the error
        reason: String,
    },

    /// Asset file missing on disk
    #[error("Asset file not found: {path}")]
    AssetNotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// Non-success response from the API
    #[error("{operation} returned {status}: {message}")]
    Api {
        /// Operation that failed
        operation: String,
        /// HTTP status code
        status: u16,
        /// Message from the response body
        message: String,
    },

    /// Transport-level failure
    #[error("{operation} request failed: {source}")]
    Http {
        /// Operation that failed
        operation: String,
        /// Underlying reqwest error
        #[source]
        source: reqwest::Error,
    },

    /// Release upload URL could not be used
    #[error("Invalid upload URL '{url}': {reason}")]
    InvalidUploadUrl {
        /// URL returned by the API
        url: String,
        /// Reason for the error
        reason: String,
    },
}

/// Plugin resolution errors
#[derive(Error, Debug)]
pub enum PluginError {
    /// Plugin directory missing
    #[error("Plugin '{name}' not found at {path}")]
    NotFound {
        /// Plugin name
        name: String,
        /// Directory that was checked
        path: PathBuf,
    },

    /// Directory exists but has no package.json
    #[error("No package.json found in {path}")]
    MissingPackageJson {
        /// Plugin directory
        path: PathBuf,
    },

    /// package.json is not a JSON object
    #[error("Malformed package.json at {path}: {reason}")]
    MalformedPackageJson {
        /// Path to package.json
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// Required npm script is missing
    #[error("Plugin '{plugin}' has no '{script}' script in package.json")]
    MissingScript {
        /// Plugin name
        plugin: String,
        /// Script name
        script: String,
    },

    /// No tarball matched
    #[error("No tarball found for {plugin}{} in {path}", version.as_ref().map(|v| format!(" {v}")).unwrap_or_default())]
    TarballNotFound {
        /// Plugin name
        plugin: String,
        /// Requested version, if any
        version: Option<String>,
        /// Directory that was scanned
        path: PathBuf,
    },
}

/// npm subprocess errors
#[derive(Error, Debug)]
pub enum NpmError {
    /// npm binary missing
    #[error("'{program}' not found in PATH")]
    NotFound {
        /// Program that was looked up
        program: String,
    },

    /// npm exited unsuccessfully
    #[error("{command} exited with code {code}")]
    Failed {
        /// Command line that was run
        command: String,
        /// Exit code (-1 when killed by a signal)
        code: i32,
    },

    /// npm exceeded the timeout
    #[error("{command} timed out after {seconds}s")]
    TimedOut {
        /// Command line that was run
        command: String,
        /// Timeout in seconds
        seconds: u64,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Explicit version disagrees with package.json
    #[error("Version mismatch for '{plugin}': requested {requested}, package.json has {found}")]
    VersionMismatch {
        /// Plugin name
        plugin: String,
        /// Version on the command line
        requested: String,
        /// Version in package.json
        found: String,
    },
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Version(VersionError::InvalidVersion { .. }) => vec![
                "Use strict semantic versioning: MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]".to_string(),
                "Example: 1.2.3 or 1.2.3-beta.1".to_string(),
            ],
            ReleaseError::Git(GitError::DirtyWorkingDirectory) => vec![
                "Commit pending changes: git add . && git commit -m 'message'".to_string(),
                "Stash changes temporarily: git stash".to_string(),
                "Skip the check with --skip-git-check".to_string(),
            ],
            ReleaseError::Git(GitError::NotRepository) => vec![
                "Change into the plugins repository before running the releaser".to_string(),
            ],
            ReleaseError::GitHub(GitHubError::MissingToken) => vec![
                "Export a token with repo scope: export GITHUB_TOKEN=<token>".to_string(),
                "Or reuse the GitHub CLI login: export GITHUB_TOKEN=$(gh auth token)".to_string(),
            ],
            ReleaseError::GitHub(GitHubError::RepositoryUnknown { .. }) => vec![
                "Set GITHUB_REPOSITORY=owner/repo".to_string(),
                "Verify git remote URL: git remote -v".to_string(),
            ],
            ReleaseError::Cli(CliError::VersionMismatch {
                plugin, requested, ..
            }) => vec![
                format!("Bump the plugin first: releaser bump {plugin} {requested}"),
                format!("Or release the current version: releaser release {plugin}"),
            ],
            ReleaseError::Plugin(PluginError::TarballNotFound { plugin, .. }) => vec![
                format!("Build the tarball first: releaser package {plugin}"),
                "Pass an explicit file with --tarball <path>".to_string(),
                "Release without an asset using --no-tarball".to_string(),
            ],
            ReleaseError::Plugin(PluginError::NotFound { .. }) => vec![
                "Plugin names are directory names at the repository root".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Whether the failure happened before any state was modified
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ReleaseError::Version(_)
                | ReleaseError::Plugin(PluginError::NotFound { .. })
                | ReleaseError::Plugin(PluginError::MissingPackageJson { .. })
                | ReleaseError::Git(GitError::DirtyWorkingDirectory)
                | ReleaseError::Git(GitError::NotRepository)
                | ReleaseError::Cli(CliError::VersionMismatch { .. })
                | ReleaseError::GitHub(GitHubError::MissingToken)
        )
    }
}
