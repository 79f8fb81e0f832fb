//! GitHub release management for plugin releases

use super::models::{CreateReleaseRequest, Release, ReleaseAsset, UpdateReleaseRequest};
use super::{GitHubClient, GitHubRepo, api_error};
use crate::error::{GitHubError, Result};
use crate::git::plugin_tag_name;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use std::future::Future;
use std::path::Path;

/// Display name of a plugin release: `<plugin> v<version>`
pub fn release_name(plugin: &str, version: &str) -> String {
    format!("{} v{}", plugin, version)
}

/// Release operations the `release` command needs from GitHub
pub trait ReleaseApi {
    /// Repository releases are created in
    fn repo(&self) -> &GitHubRepo;

    /// Release for `tag`, `None` if GitHub has none
    fn get_release(&self, tag: &str) -> impl Future<Output = Result<Option<Release>>>;

    /// Release with display name `name` among the 100 most recent.
    ///
    /// Drafts have no tag until published, so this is how a re-run finds
    /// the draft it created earlier.
    fn get_release_by_name(&self, name: &str) -> impl Future<Output = Result<Option<Release>>>;

    /// Create a draft release `<plugin> v<version>` for tag `<plugin>-<version>`
    fn create_draft_release(
        &self,
        plugin: &str,
        version: &str,
        body: &str,
        target_commit: Option<&str>,
    ) -> impl Future<Output = Result<Release>>;

    /// Upload a file as a release asset, named `name` or after the file
    fn upload_asset(
        &self,
        release: &Release,
        path: &Path,
        name: Option<&str>,
    ) -> impl Future<Output = Result<ReleaseAsset>>;

    /// Delete an uploaded asset
    fn delete_asset(&self, asset_id: u64) -> impl Future<Output = Result<()>>;

    /// Turn a draft into a published release
    fn publish_release(&self, release_id: u64) -> impl Future<Output = Result<Release>>;
}

/// GitHub release manager backed by the REST API
#[derive(Debug, Clone)]
pub struct GitHubReleaseManager {
    client: GitHubClient,
}

impl GitHubReleaseManager {
    /// Wrap an authenticated client
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }
}

/// File name used for an uploaded asset
pub(crate) fn asset_name<'a>(path: &'a Path, name: Option<&'a str>) -> Result<&'a str> {
    match name {
        Some(name) => Ok(name),
        None => path.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
            GitHubError::AssetNotFound {
                path: path.to_path_buf(),
            }
            .into()
        }),
    }
}

/// Concrete upload endpoint from the `upload_url` template
pub(crate) fn upload_endpoint(template: &str, name: &str) -> Result<url::Url> {
    let base = template.split('{').next().unwrap_or(template);
    let mut url = url::Url::parse(base).map_err(|e| GitHubError::InvalidUploadUrl {
        url: template.to_string(),
        reason: e.to_string(),
    })?;
    url.query_pairs_mut().append_pair("name", name);
    Ok(url)
}

impl ReleaseApi for GitHubReleaseManager {
    fn repo(&self) -> &GitHubRepo {
        self.client.repo()
    }

    async fn get_release(&self, tag: &str) -> Result<Option<Release>> {
        let url = self.client.repo_url(&format!("/releases/tags/{}", tag));
        let response = self
            .client
            .send("get_release", self.client.http().get(&url))
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                self.client.json("get_release", response).await.map(Some)
            }
            _ => Err(api_error("get_release", response).await),
        }
    }

    async fn get_release_by_name(&self, name: &str) -> Result<Option<Release>> {
        let url = self.client.repo_url("/releases");
        let response = self
            .client
            .send_checked(
                "list_releases",
                self.client.http().get(&url).query(&[("per_page", "100")]),
            )
            .await?;
        let releases: Vec<Release> = self.client.json("list_releases", response).await?;

        Ok(releases
            .into_iter()
            .find(|release| release.name.as_deref() == Some(name)))
    }

    async fn create_draft_release(
        &self,
        plugin: &str,
        version: &str,
        body: &str,
        target_commit: Option<&str>,
    ) -> Result<Release> {
        let prerelease = semver::Version::parse(version)
            .map(|v| !v.pre.is_empty())
            .unwrap_or(false);

        let request = CreateReleaseRequest {
            tag_name: plugin_tag_name(plugin, version),
            name: release_name(plugin, version),
            body: body.to_string(),
            draft: true,
            prerelease,
            target_commitish: target_commit.map(str::to_string),
        };

        let url = self.client.repo_url("/releases");
        let response = self
            .client
            .send_checked("create_release", self.client.http().post(&url).json(&request))
            .await?;
        self.client.json("create_release", response).await
    }

    async fn upload_asset(
        &self,
        release: &Release,
        path: &Path,
        name: Option<&str>,
    ) -> Result<ReleaseAsset> {
        if !path.is_file() {
            return Err(GitHubError::AssetNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let name = asset_name(path, name)?;
        let url = upload_endpoint(&release.upload_url, name)?;

        let file = tokio::fs::File::open(path).await?;
        let length = file.metadata().await?.len();
        let body = reqwest::Body::wrap_stream(tokio_util::io::ReaderStream::new(file));

        log::info!("Uploading {} ({} bytes) to release {}", name, length, release.id);
        let request = self
            .client
            .http()
            .post(url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(CONTENT_LENGTH, length)
            .body(body);

        let response = self.client.send_checked("upload_asset", request).await?;
        self.client.json("upload_asset", response).await
    }

    async fn delete_asset(&self, asset_id: u64) -> Result<()> {
        let url = self.client.repo_url(&format!("/releases/assets/{}", asset_id));
        self.client
            .send_checked("delete_asset", self.client.http().delete(&url))
            .await?;
        Ok(())
    }

    async fn publish_release(&self, release_id: u64) -> Result<Release> {
        let url = self.client.repo_url(&format!("/releases/{}", release_id));
        let response = self
            .client
            .send_checked(
                "publish_release",
                self.client
                    .http()
                    .patch(&url)
                    .json(&UpdateReleaseRequest { draft: false }),
            )
            .await?;
        self.client.json("publish_release", response).await
    }
}
