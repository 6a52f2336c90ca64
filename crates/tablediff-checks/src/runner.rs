//! Check runner
//!
//! Renders every template in a checks directory against every resolved
//! table and submits the rendered SQL to the query service. Templates bind
//! four variables: `dataset` (the project id), `table`, `schema` (dev) and
//! `compare_schema`.

use crate::result::{CheckResult, TableCheckResult};
use minijinja::{context, Environment, UndefinedBehavior};
use std::path::Path;
use tablediff_core::{SchemaPrefixPolicy, TableRef};
use tablediff_query::{QueryClient, QueryError};

/// Errors raised while running checks
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Failed to read checks directory {0}: {1}")]
    IoError(String, String),

    #[error("Failed to render check {check}: {source}")]
    RenderError {
        check: String,
        #[source]
        source: minijinja::Error,
    },

    #[error(transparent)]
    QueryError(#[from] QueryError),
}

/// Runs a directory of check templates against a set of tables
pub struct CheckRunner<'a> {
    client: &'a dyn QueryClient,
    policy: &'a SchemaPrefixPolicy,
    project_id: String,
}

impl<'a> CheckRunner<'a> {
    pub fn new(
        client: &'a dyn QueryClient,
        policy: &'a SchemaPrefixPolicy,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            policy,
            project_id: project_id.into(),
        }
    }

    /// Run every check in `checks_dir` against every table in `models`.
    ///
    /// A missing directory is a soft skip (the custom-checks directory is
    /// optional), logged and returning an empty result set. Render and
    /// query errors are fatal. A (check, table) pair is retained only when
    /// its result set is non-empty, and a check with zero retained tables
    /// is dropped entirely.
    pub async fn run(
        &self,
        models: &[TableRef],
        checks_dir: &Path,
    ) -> Result<Vec<CheckResult>, CheckError> {
        if !checks_dir.exists() {
            tracing::warn!(path = %checks_dir.display(), "checks path not found, skipping");
            return Ok(Vec::new());
        }

        tracing::info!(path = %checks_dir.display(), "running checks");

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        let mut results = Vec::new();
        for (check_name, template) in self.load_templates(checks_dir)? {
            let mut tables = Vec::new();

            for model in models {
                tracing::info!(
                    check = %check_name,
                    schema = %model.schema,
                    table = %model.table,
                    "running check"
                );

                let compare_schema = self.policy.compare_schema(&model.schema);
                let sql = env
                    .render_str(
                        &template,
                        context! {
                            dataset => &self.project_id,
                            table => &model.table,
                            schema => &model.schema,
                            compare_schema => &compare_schema,
                        },
                    )
                    .map_err(|e| CheckError::RenderError {
                        check: check_name.clone(),
                        source: e,
                    })?;

                let rows = self.client.query(&sql).await?;
                if !rows.is_empty() {
                    tracing::info!(check = %check_name, table = %model.table, rows = rows.len(), "drift detected");
                    tables.push(TableCheckResult {
                        table: model.table.clone(),
                        dev_schema: model.schema.clone(),
                        compare_schema,
                        rows,
                    });
                }
            }

            if !tables.is_empty() {
                results.push(CheckResult {
                    name: check_name,
                    tables,
                });
            }
        }

        Ok(results)
    }

    /// Enumerate template files in the checks directory, non-recursively,
    /// sorted by file name so discovery order is deterministic.
    fn load_templates(&self, checks_dir: &Path) -> Result<Vec<(String, String)>, CheckError> {
        let io_err =
            |e: std::io::Error| CheckError::IoError(checks_dir.display().to_string(), e.to_string());

        let mut templates = Vec::new();
        for entry in std::fs::read_dir(checks_dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            if !entry.file_type().map_err(io_err)?.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            let source = std::fs::read_to_string(entry.path()).map_err(io_err)?;
            templates.push((name, source));
        }

        templates.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablediff_query::{MockQueryClient, QueryValue};

    fn policy() -> SchemaPrefixPolicy {
        SchemaPrefixPolicy::new("dev_", "prod_", "legacy_")
    }

    fn models() -> Vec<TableRef> {
        vec![
            TableRef::new("analytics", "dev_sales", "orders"),
            TableRef::new("analytics", "dev_sales", "customers"),
        ]
    }

    fn write_check(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[tokio::test]
    async fn renders_all_template_variables() {
        let dir = tempfile::tempdir().unwrap();
        write_check(
            dir.path(),
            "check.sql",
            "SELECT * FROM `{{ dataset }}.{{ schema }}.{{ table }}` \
             EXCEPT DISTINCT SELECT * FROM `{{ dataset }}.{{ compare_schema }}.{{ table }}`",
        );

        let client = MockQueryClient::new();
        let policy = policy();
        let runner = CheckRunner::new(&client, &policy, "my-project");
        runner.run(&models()[..1], dir.path()).await.unwrap();

        let queries = client.executed_queries().await;
        assert_eq!(queries.len(), 1);
        assert!(queries[0].contains("`my-project.dev_sales.orders`"));
        assert!(queries[0].contains("`my-project.prod_sales.orders`"));
    }

    #[tokio::test]
    async fn retains_only_non_empty_results() {
        let dir = tempfile::tempdir().unwrap();
        write_check(dir.path(), "check.sql", "SELECT '{{ table }}'");

        // Only the orders table produces rows
        let client = MockQueryClient::new()
            .with_response("'orders'", vec![vec![QueryValue::Int(1)]]);
        let policy = policy();
        let runner = CheckRunner::new(&client, &policy, "my-project");

        let results = runner.run(&models(), dir.path()).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "check.sql");
        assert_eq!(results[0].tables.len(), 1);
        assert_eq!(results[0].tables[0].table, "orders");
        assert_eq!(results[0].tables[0].dev_schema, "dev_sales");
        assert_eq!(results[0].tables[0].compare_schema, "prod_sales");
    }

    #[tokio::test]
    async fn check_with_no_retained_tables_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        write_check(dir.path(), "check.sql", "SELECT '{{ table }}'");

        let client = MockQueryClient::new();
        let policy = policy();
        let runner = CheckRunner::new(&client, &policy, "my-project");

        let results = runner.run(&models(), dir.path()).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn missing_directory_is_a_soft_skip() {
        let client = MockQueryClient::new();
        let policy = policy();
        let runner = CheckRunner::new(&client, &policy, "my-project");

        let results = runner
            .run(&models(), Path::new("does/not/exist"))
            .await
            .unwrap();
        assert!(results.is_empty());
        assert!(client.executed_queries().await.is_empty());
    }

    #[tokio::test]
    async fn checks_run_in_file_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write_check(dir.path(), "b_check.sql", "SELECT 'b' -- {{ table }}");
        write_check(dir.path(), "a_check.sql", "SELECT 'a' -- {{ table }}");

        let client = MockQueryClient::new()
            .with_response("'a'", vec![vec![QueryValue::Int(1)]])
            .with_response("'b'", vec![vec![QueryValue::Int(2)]]);
        let policy = policy();
        let runner = CheckRunner::new(&client, &policy, "my-project");

        let results = runner.run(&models()[..1], dir.path()).await.unwrap();
        assert_eq!(
            results.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["a_check.sql", "b_check.sql"]
        );
    }

    #[tokio::test]
    async fn unresolved_template_variable_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_check(dir.path(), "bad.sql", "SELECT {{ nonexistent }}");

        let client = MockQueryClient::new();
        let policy = policy();
        let runner = CheckRunner::new(&client, &policy, "my-project");

        let result = runner.run(&models()[..1], dir.path()).await;
        assert!(matches!(result, Err(CheckError::RenderError { .. })));
    }

    #[tokio::test]
    async fn query_errors_propagate() {
        let dir = tempfile::tempdir().unwrap();
        write_check(dir.path(), "check.sql", "SELECT '{{ table }}'");

        let client = MockQueryClient::new()
            .with_query_error(QueryError::QueryFailed("boom".to_string()));
        let policy = policy();
        let runner = CheckRunner::new(&client, &policy, "my-project");

        let result = runner.run(&models()[..1], dir.path()).await;
        assert!(matches!(result, Err(CheckError::QueryError(_))));
    }

    #[tokio::test]
    async fn irregular_schema_uses_fallback_prefix() {
        let dir = tempfile::tempdir().unwrap();
        write_check(dir.path(), "check.sql", "SELECT * FROM {{ compare_schema }}.{{ table }}");

        let client = MockQueryClient::new();
        let policy = policy().with_irregular_schemas(["dev_sales".to_string()]);
        let runner = CheckRunner::new(&client, &policy, "my-project");
        runner.run(&models()[..1], dir.path()).await.unwrap();

        let queries = client.executed_queries().await;
        assert!(queries[0].contains("legacy_sales.orders"));
    }
}
