use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use tablediff_core::SchemaPrefixPolicy;
use tablediff_github::{GithubHost, PullRequest};
use tablediff_query::{BigQueryRunner, QueryClient};

mod pipeline;

use pipeline::{PipelineConfig, PipelineOutcome};

/// tablediff - dev/prod table drift checks for dbt pull requests
#[derive(Parser)]
#[command(name = "tablediff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Owner of the GitHub repository
    #[arg(short = 'o', long)]
    org_name: String,

    /// Name of the GitHub repository
    #[arg(short = 'r', long)]
    repo_name: String,

    /// GitHub personal access token
    #[arg(short = 't', long)]
    auth_token: String,

    /// The number of the pull request
    #[arg(short = 'l', long)]
    pr_id: u64,

    /// Path to dbt's manifest.json
    #[arg(long, default_value = "target/manifest.json")]
    manifest_file: PathBuf,

    /// BigQuery project to run checks against
    #[arg(long)]
    project_id: String,

    /// Path to a service account keyfile (Application Default Credentials
    /// are used when omitted)
    #[arg(long)]
    keyfile_path: Option<PathBuf>,

    /// Directory holding the standard check templates
    #[arg(long, default_value = "sql_checks")]
    checks_path: PathBuf,

    /// A local folder containing any custom SQL checks to run
    #[arg(long)]
    custom_checks_path: Option<PathBuf>,

    /// Comma-separated dev schemas to always skip during checks
    #[arg(long, value_delimiter = ',')]
    ignored_schemas: Vec<String>,

    /// Comma-separated dev schemas that use the fallback prefix in prod
    #[arg(long, value_delimiter = ',')]
    irregular_schemas: Vec<String>,

    /// Prefix used by development schemas
    #[arg(long, default_value = "dev_")]
    dev_prefix: String,

    /// Prefix used by production schemas
    #[arg(long, default_value = "prod_")]
    prod_prefix: String,

    /// Uncommon prefix used in production by irregular schemas only
    /// (defaults to the prod prefix)
    #[arg(long)]
    fallback_prefix: Option<String>,

    /// Also write the composed comment to this file
    #[arg(long)]
    output_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn policy(&self) -> SchemaPrefixPolicy {
        let fallback = self
            .fallback_prefix
            .clone()
            .unwrap_or_else(|| self.prod_prefix.clone());

        SchemaPrefixPolicy::new(&self.dev_prefix, &self.prod_prefix, fallback)
            .with_irregular_schemas(self.irregular_schemas.iter().cloned())
            .with_ignored_schemas(self.ignored_schemas.iter().cloned())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = PipelineConfig {
        project_id: cli.project_id.clone(),
        manifest_file: cli.manifest_file.clone(),
        checks_path: cli.checks_path.clone(),
        custom_checks_path: cli.custom_checks_path.clone(),
        policy: cli.policy(),
    };

    let pr = PullRequest::new(&cli.org_name, &cli.repo_name, cli.pr_id);
    let host = GithubHost::new(&cli.auth_token);
    let client = build_query_client(&cli).await?;

    let outcome = pipeline::run(&config, &pr, &host, client.as_ref()).await?;

    match outcome {
        PipelineOutcome::NoRelevantModels => {
            println!("{}", "No relevant models changed in this PR".green());
        }
        PipelineOutcome::Commented {
            comment,
            failing_checks,
        } => {
            if let Some(path) = &cli.output_file {
                std::fs::write(path, &comment)?;
                eprintln!("{} {}", "Results written to:".cyan(), path.display());
            }

            if failing_checks > 0 {
                println!(
                    "{}",
                    format!("{} check(s) detected drift, comment posted", failing_checks)
                        .yellow()
                        .bold()
                );
            } else {
                println!("{}", "No drift detected, comment posted".green());
            }
        }
    }

    Ok(())
}

/// Construct the BigQuery client once; it is held for the whole run.
async fn build_query_client(cli: &Cli) -> Result<Box<dyn QueryClient>> {
    let runner = match &cli.keyfile_path {
        Some(keyfile) => BigQueryRunner::from_service_account_file(&cli.project_id, keyfile).await?,
        None => BigQueryRunner::with_adc(&cli.project_id).await?,
    };
    Ok(Box::new(runner))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn policy_from_flags() {
        let cli = Cli::parse_from([
            "tablediff",
            "-o",
            "acme",
            "-r",
            "warehouse",
            "-t",
            "token",
            "-l",
            "7",
            "--project-id",
            "my-project",
            "--ignored-schemas",
            "dev_scratch,dev_tmp",
            "--irregular-schemas",
            "dev_legacy",
            "--fallback-prefix",
            "legacy_",
        ]);

        let policy = cli.policy();
        assert_eq!(policy.dev_prefix, "dev_");
        assert_eq!(policy.prod_prefix, "prod_");
        assert_eq!(policy.fallback_prefix, "legacy_");
        assert!(policy.ignored_schemas.contains("dev_scratch"));
        assert!(policy.ignored_schemas.contains("dev_tmp"));
        assert!(policy.irregular_schemas.contains("dev_legacy"));
    }

    #[test]
    fn fallback_prefix_defaults_to_prod_prefix() {
        let cli = Cli::parse_from([
            "tablediff",
            "-o",
            "acme",
            "-r",
            "warehouse",
            "-t",
            "token",
            "-l",
            "7",
            "--project-id",
            "my-project",
        ]);

        assert_eq!(cli.policy().fallback_prefix, "prod_");
    }
}
