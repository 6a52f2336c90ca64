//! Pipeline orchestration
//!
//! Runs the whole comparison start to finish: changed files from the PR,
//! manifest resolution, standard then custom checks, aggregation, and the
//! comment posted back to the PR. Single control flow, every query awaited
//! in turn, no retries; any error aborts the run.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tablediff_checks::{merge_results, CheckRunner};
use tablediff_core::SchemaPrefixPolicy;
use tablediff_dbt::{relevant_files, Manifest};
use tablediff_github::{PullRequest, PullRequestHost};
use tablediff_query::QueryClient;
use tablediff_report::{aggregate, compose_comment};

/// Everything the pipeline needs besides its collaborators
pub struct PipelineConfig {
    /// Query-service project id, bound as `dataset` in check templates
    pub project_id: String,

    /// Path to dbt's manifest.json
    pub manifest_file: PathBuf,

    /// Directory holding the standard check templates
    pub checks_path: PathBuf,

    /// Optional directory of user-supplied check templates
    pub custom_checks_path: Option<PathBuf>,

    /// Schema-prefix translation rules
    pub policy: SchemaPrefixPolicy,
}

/// What a run produced
#[derive(Debug, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// No changed file resolved to a comparable table; nothing was posted
    NoRelevantModels,

    /// A comment was posted to the pull request
    Commented {
        /// The exact comment body that was published
        comment: String,

        /// Number of checks that detected drift
        failing_checks: usize,
    },
}

/// Run the comparison for one pull request.
pub async fn run(
    config: &PipelineConfig,
    pr: &PullRequest,
    host: &dyn PullRequestHost,
    client: &dyn QueryClient,
) -> Result<PipelineOutcome> {
    let files = host
        .changed_files(pr)
        .await
        .context("failed to list changed files")?;
    tracing::info!(count = files.len(), "files changed in PR");

    let relevant = relevant_files(&files);
    tracing::info!(files = ?relevant, "relevant model files");

    let manifest = Manifest::from_file(&config.manifest_file)?;
    let models = manifest.resolve_tables(&relevant, &config.policy);

    if models.is_empty() {
        tracing::info!("no relevant models changed, skipping checks");
        return Ok(PipelineOutcome::NoRelevantModels);
    }
    tracing::info!(models = ?models.iter().map(|m| m.fqn()).collect::<Vec<_>>(), "relevant models");

    let runner = CheckRunner::new(client, &config.policy, &config.project_id);
    let standard = runner.run(&models, &config.checks_path).await?;
    let custom = match &config.custom_checks_path {
        Some(path) => runner.run(&models, path).await?,
        None => Vec::new(),
    };
    let results = merge_results(standard, custom);

    let failing_checks = results.len();
    let report = aggregate(&results)?;
    let comment = compose_comment(&report, &relevant);

    host.post_comment(pr, &comment)
        .await
        .context("failed to post PR comment")?;

    Ok(PipelineOutcome::Commented {
        comment,
        failing_checks,
    })
}
