//! Pull-request host trait

/// Coordinates of one pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// Owner of the repository
    pub org: String,

    /// Repository name
    pub repo: String,

    /// Pull request number
    pub number: u64,
}

impl PullRequest {
    pub fn new(org: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            org: org.into(),
            repo: repo.into(),
            number,
        }
    }
}

/// Errors returned by a pull-request host
#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    #[error("Request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("GitHub returned {status} for {url}: {body}")]
    StatusError {
        status: u16,
        url: String,
        body: String,
    },
}

/// Trait for the two pull-request operations the pipeline needs
#[async_trait::async_trait]
pub trait PullRequestHost: Send + Sync {
    /// List the files modified in a pull request, in API order
    async fn changed_files(&self, pr: &PullRequest) -> Result<Vec<String>, GithubError>;

    /// Publish a comment on a pull request
    async fn post_comment(&self, pr: &PullRequest, body: &str) -> Result<(), GithubError>;
}
