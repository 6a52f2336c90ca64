//! GitHub REST API client

use crate::host::{GithubError, PullRequest, PullRequestHost};
use serde::Deserialize;

const DEFAULT_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("tablediff/", env!("CARGO_PKG_VERSION"));
const PER_PAGE: usize = 100;

/// One entry of the pulls/{n}/files response
#[derive(Debug, Deserialize)]
struct PrFile {
    filename: String,
}

/// GitHub-backed pull-request host
pub struct GithubHost {
    client: reqwest::Client,
    token: String,
    api_base: String,
}

impl GithubHost {
    /// Create a host authenticating with a personal access token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Point the host at a different API base (GitHub Enterprise, tests)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn files_url(&self, pr: &PullRequest, page: usize) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}/files?per_page={}&page={}",
            self.api_base, pr.org, pr.repo, pr.number, PER_PAGE, page
        )
    }

    fn comments_url(&self, pr: &PullRequest) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_base, pr.org, pr.repo, pr.number
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GithubError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        Err(GithubError::StatusError { status, url, body })
    }
}

#[async_trait::async_trait]
impl PullRequestHost for GithubHost {
    async fn changed_files(&self, pr: &PullRequest) -> Result<Vec<String>, GithubError> {
        let mut files = Vec::new();
        let mut page = 1;

        loop {
            let url = self.files_url(pr, page);
            tracing::debug!(%url, "fetching changed files");

            let response = self.request(self.client.get(&url)).send().await?;
            let batch: Vec<PrFile> = Self::check_status(response).await?.json().await?;
            let batch_len = batch.len();

            files.extend(batch.into_iter().map(|file| file.filename));

            if batch_len < PER_PAGE {
                break;
            }
            page += 1;
        }

        Ok(files)
    }

    async fn post_comment(&self, pr: &PullRequest, body: &str) -> Result<(), GithubError> {
        let url = self.comments_url(pr);
        tracing::debug!(%url, "posting comment");

        let response = self
            .request(self.client.post(&url))
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }
}
