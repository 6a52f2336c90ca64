//! GitHub access
//!
//! The pipeline touches GitHub twice: once to list the files changed in
//! the pull request and once to post the drift report as a comment. Both
//! sit behind the narrow [`PullRequestHost`] trait so tests can substitute
//! a fake.

pub mod client;
pub mod host;

pub use client::GithubHost;
pub use host::{GithubError, PullRequest, PullRequestHost};
