//! GitHub integration for release operations

mod client;
mod models;
mod release_manager;
mod repo;

pub(crate) use client::api_error;
pub use client::{DEFAULT_API_URL, GitHubClient};
pub use models::{CreateReleaseRequest, Release, ReleaseAsset};
pub use release_manager::{GitHubReleaseManager, ReleaseApi, release_name};
pub use repo::GitHubRepo;

use crate::EnvConfig;
use crate::error::Result;
use crate::git::GitRepository;

/// Work out which repository releases go to.
///
/// `GITHUB_REPOSITORY` wins; otherwise the URL of `remote` is parsed.
pub fn resolve_repo(env: &EnvConfig, git: &GitRepository, remote: &str) -> Result<GitHubRepo> {
    if let Some(slug) = env.get("GITHUB_REPOSITORY") {
        return GitHubRepo::parse(&slug);
    }

    match git.remote_url(remote)? {
        Some(url) => GitHubRepo::from_remote_url(&url),
        None => Err(crate::error::GitHubError::RepositoryUnknown {
            reason: format!("remote '{}' is not configured and GITHUB_REPOSITORY is unset", remote),
        }
        .into()),
    }
}
