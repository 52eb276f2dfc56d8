//! GitHub commit source

mod models;
mod repo_hint;

pub use repo_hint::parse_commit_link;

use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use deploynotes_core::config::GitHubConfig;
use deploynotes_core::{CommitDetail, RepoRef};

use crate::error::{Result, SourceError};
use crate::traits::CommitSource;

use models::CommitResponse;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub REST client for commit lookups
pub struct GitHubClient {
    api_url: Url,
    token: Option<String>,
    include_files: bool,
    client: Client,
}

impl GitHubClient {
    /// Create a new client from configuration
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let api_url = Url::parse(&config.api_url).map_err(|e| {
            SourceError::ConfigurationError(format!(
                "Invalid GitHub API URL '{}': {}",
                config.api_url, e
            ))
        })?;

        let client = Client::builder()
            .user_agent(concat!("deploynotes/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            api_url,
            token: config.token.clone().filter(|t| !t.is_empty()),
            include_files: config.include_files,
            client,
        })
    }

    /// Build `<api>/repos/<owner>/<repo>/commits/<sha>`
    fn commit_url(&self, repo: &RepoRef, sha: &str) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                SourceError::ConfigurationError(format!(
                    "GitHub API URL cannot be a base: {}",
                    self.api_url
                ))
            })?
            .pop_if_empty()
            .extend(["repos", repo.owner.as_str(), repo.repo.as_str(), "commits", sha]);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl CommitSource for GitHubClient {
    fn name(&self) -> &str {
        "GitHub"
    }

    fn is_available(&self) -> bool {
        self.token.is_some()
    }

    #[instrument(skip(self))]
    async fn get_commit(&self, repo: Option<&RepoRef>, sha: &str) -> Result<CommitDetail> {
        let repo = repo.ok_or_else(|| {
            SourceError::ConfigurationError("GitHub lookups need an owner/repo".to_string())
        })?;
        let token = self.token.as_ref().ok_or_else(|| {
            SourceError::AuthenticationFailed("No GitHub token configured".to_string())
        })?;

        let url = self.commit_url(repo, sha)?;
        debug!(url = %url, "fetching commit");

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SourceError::from_status(
                status,
                &format!("commit {} in {}", sha, repo),
                error_text,
            ));
        }

        let commit: CommitResponse = response.json().await?;
        Ok(commit.into_detail(self.include_files))
    }
}
