//! GitHub repository coordinates (`owner/repo`).

use crate::error::{GitHubError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Owner and name of the repository releases are created in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubRepo {
    /// Organisation or user
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl fmt::Display for GitHubRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl GitHubRepo {
    /// Parse `owner/repo` notation (as found in `GITHUB_REPOSITORY`)
    pub fn parse(slug: &str) -> Result<Self> {
        let mut parts = slug.trim().split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() => Ok(Self {
                owner: owner.to_string(),
                repo: repo.trim_end_matches(".git").to_string(),
            }),
            _ => Err(GitHubError::RepositoryUnknown {
                reason: format!("invalid repository '{}', expected owner/repo", slug),
            }
            .into()),
        }
    }

    /// Parse owner/repo from a git remote URL.
    ///
    /// Supports:
    /// - SSH SCP-like: git@github.com:owner/repo.git
    /// - HTTPS: https://github.com/owner/repo.git
    /// - SSH URL: ssh://git@github.com/owner/repo
    pub fn from_remote_url(url: &str) -> Result<Self> {
        static REMOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"github\.com[:/](?P<owner>[^/]+)/(?P<repo>[^/]+?)(?:\.git)?/?$")
                .expect("GitHub remote regex is valid")
        });

        REMOTE_RE
            .captures(url.trim())
            .map(|caps| Self {
                owner: caps["owner"].to_string(),
                repo: caps["repo"].to_string(),
            })
            .ok_or_else(|| {
                GitHubError::RepositoryUnknown {
                    reason: format!("could not parse GitHub owner/repo from remote URL '{}'", url),
                }
                .into()
            })
    }

    /// Public download URL of a release asset once the release is published
    pub fn download_url(&self, tag: &str, asset_name: &str) -> String {
        format!(
            "https://github.com/{}/{}/releases/download/{}/{}",
            self.owner, self.repo, tag, asset_name
        )
    }
}
