//! Authenticated HTTP client for the GitHub REST API.

use super::GitHubRepo;
use super::models::ApiErrorBody;
use crate::EnvConfig;
use crate::error::{CliError, GitHubError, ReleaseError, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;

/// Public API endpoint used when `GITHUB_API_URL` is not set
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Per-request timeout; asset uploads of plugin tarballs stay well below it
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// GitHub REST client bound to one repository
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    repo: GitHubRepo,
}

impl GitHubClient {
    /// Build a client from `GITHUB_TOKEN` / `GH_TOKEN` and `GITHUB_API_URL`.
    ///
    /// A missing token is an error; there is no anonymous fallback.
    pub fn from_env(env: &EnvConfig, repo: GitHubRepo) -> Result<Self> {
        let token = env
            .get("GITHUB_TOKEN")
            .or_else(|| env.get("GH_TOKEN"))
            .ok_or(GitHubError::MissingToken)?;
        let api_url = env
            .get("GITHUB_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self::new(&token, &api_url, repo)
    }

    /// Build a client with an explicit token and API endpoint
    pub fn new(token: &str, api_url: &str, repo: GitHubRepo) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.trim())).map_err(|_| {
            ReleaseError::Cli(CliError::InvalidArguments {
                reason: "GitHub token contains characters not allowed in a header".to_string(),
            })
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static("2022-11-28"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("plugin-releaser/", env!("CARGO_PKG_VERSION"))),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GitHubError::Http {
                operation: "client_init".to_string(),
                source: e,
            })?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            repo,
        })
    }

    /// Repository this client targets
    pub fn repo(&self) -> &GitHubRepo {
        &self.repo
    }

    /// Underlying HTTP client (shares auth headers)
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// `{api}/repos/{owner}/{repo}{path}`
    pub(crate) fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.api_url, self.repo.owner, self.repo.repo, path
        )
    }

    /// Send a request, turning transport failures into [`GitHubError::Http`]
    pub(crate) async fn send(&self, operation: &str, request: RequestBuilder) -> Result<Response> {
        log::debug!("GitHub API: {}", operation);
        request.send().await.map_err(|e| {
            GitHubError::Http {
                operation: operation.to_string(),
                source: e,
            }
            .into()
        })
    }

    /// Send a request and fail on any non-success status
    pub(crate) async fn send_checked(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<Response> {
        let response = self.send(operation, request).await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(api_error(operation, response).await)
        }
    }

    /// Decode a JSON response body
    pub(crate) async fn json<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        response: Response,
    ) -> Result<T> {
        response.json().await.map_err(|e| {
            GitHubError::Http {
                operation: operation.to_string(),
                source: e,
            }
            .into()
        })
    }
}

/// Convert a failed response into [`GitHubError::Api`], keeping GitHub's message
pub(crate) async fn api_error(operation: &str, response: Response) -> ReleaseError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    GitHubError::Api {
        operation: operation.to_string(),
        status: status.as_u16(),
        message: error_message(status, &text),
    }
    .into()
}

fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    }
}
