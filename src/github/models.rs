//! GitHub REST payloads used by the releaser.

use serde::{Deserialize, Serialize};

/// A GitHub release (draft or published)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Release ID
    pub id: u64,
    /// Tag the release points at (may not exist yet for drafts)
    pub tag_name: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Whether the release is still a draft
    pub draft: bool,
    /// Whether the release is marked as a pre-release
    #[serde(default)]
    pub prerelease: bool,
    /// Release page URL
    pub html_url: String,
    /// Upload URL template (`.../assets{?name,label}`)
    pub upload_url: String,
    /// Commit or branch the tag will be created from
    #[serde(default)]
    pub target_commitish: Option<String>,
    /// Release notes
    #[serde(default)]
    pub body: Option<String>,
    /// Uploaded assets
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl Release {
    /// Asset with the given file name, if already uploaded
    pub fn asset_named(&self, name: &str) -> Option<&ReleaseAsset> {
        self.assets.iter().find(|asset| asset.name == name)
    }
}

/// A file attached to a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    /// Asset ID
    pub id: u64,
    /// File name
    pub name: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// Download URL
    #[serde(default)]
    pub browser_download_url: String,
}

/// Body of `POST /repos/{owner}/{repo}/releases`
#[derive(Debug, Clone, Serialize)]
pub struct CreateReleaseRequest {
    /// Tag to create on publish
    pub tag_name: String,
    /// Display name
    pub name: String,
    /// Release notes
    pub body: String,
    /// Always true for the releaser; publishing is a separate step
    pub draft: bool,
    /// Pre-release flag (versions with a pre-release component)
    pub prerelease: bool,
    /// Commit to tag; omitted to let GitHub use the default branch tip
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_commitish: Option<String>,
}

/// Body of `PATCH /repos/{owner}/{repo}/releases/{id}`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct UpdateReleaseRequest {
    pub draft: bool,
}

/// Error body returned by the API
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}
