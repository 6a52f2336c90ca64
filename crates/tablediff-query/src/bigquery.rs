//! BigQuery query client
//!
//! Submits rendered check queries through the BigQuery jobs API. Requires
//! `bigquery.jobs.create` plus read access to the datasets under
//! comparison.
//!
//! ## Authentication
//!
//! The client supports two authentication methods:
//! 1. Service account JSON keyfile (explicit path)
//! 2. Application Default Credentials (ADC)

use crate::client::{QueryClient, QueryError};
use crate::value::{QueryValue, Row};

#[cfg(feature = "bigquery")]
use gcp_bigquery_client::{model::query_request::QueryRequest, Client as BigQueryClient};

/// BigQuery-backed query client
pub struct BigQueryRunner {
    /// Project ID used for job submission
    project_id: String,

    /// BigQuery client (only available with bigquery feature)
    #[cfg(feature = "bigquery")]
    client: BigQueryClient,

    /// Placeholder for when feature is disabled
    #[cfg(not(feature = "bigquery"))]
    _phantom: std::marker::PhantomData<()>,
}

impl BigQueryRunner {
    /// Create a new runner using a service account keyfile
    #[cfg(feature = "bigquery")]
    pub async fn from_service_account_file(
        project_id: impl Into<String>,
        key_path: impl AsRef<std::path::Path>,
    ) -> Result<Self, QueryError> {
        let project_id = project_id.into();
        let key_path_str = key_path.as_ref().to_string_lossy().to_string();

        let client = BigQueryClient::from_service_account_key_file(&key_path_str)
            .await
            .map_err(|e| {
                QueryError::AuthenticationError(format!(
                    "Failed to read service account key file '{}': {}",
                    key_path_str, e
                ))
            })?;

        Ok(Self { project_id, client })
    }

    /// Create runner without bigquery feature (returns error)
    #[cfg(not(feature = "bigquery"))]
    pub async fn from_service_account_file(
        project_id: impl Into<String>,
        _key_path: impl AsRef<std::path::Path>,
    ) -> Result<Self, QueryError> {
        let _ = project_id;
        Err(QueryError::ConfigError(
            "BigQuery support not compiled. Rebuild with: cargo build --features bigquery"
                .to_string(),
        ))
    }

    /// Create a new runner using Application Default Credentials (ADC)
    ///
    /// ADC automatically detects credentials from:
    /// - GOOGLE_APPLICATION_CREDENTIALS environment variable
    /// - gcloud CLI default credentials
    /// - GCE/GKE metadata service
    #[cfg(feature = "bigquery")]
    pub async fn with_adc(project_id: impl Into<String>) -> Result<Self, QueryError> {
        let project_id = project_id.into();

        let client = BigQueryClient::from_application_default_credentials()
            .await
            .map_err(|e| {
                QueryError::AuthenticationError(format!(
                    "Failed to authenticate with ADC: {}. \
                     Ensure GOOGLE_APPLICATION_CREDENTIALS is set or run \
                     'gcloud auth application-default login'",
                    e
                ))
            })?;

        Ok(Self { project_id, client })
    }

    /// Create runner without bigquery feature (returns error)
    #[cfg(not(feature = "bigquery"))]
    pub async fn with_adc(project_id: impl Into<String>) -> Result<Self, QueryError> {
        let _ = project_id;
        Err(QueryError::ConfigError(
            "BigQuery support not compiled. Rebuild with: cargo build --features bigquery"
                .to_string(),
        ))
    }
}

#[async_trait::async_trait]
impl QueryClient for BigQueryRunner {
    fn name(&self) -> &'static str {
        "BigQuery"
    }

    #[cfg(feature = "bigquery")]
    async fn query(&self, sql: &str) -> Result<Vec<Row>, QueryError> {
        let request = QueryRequest::new(sql.to_string());
        let query_response = self
            .client
            .job()
            .query(&self.project_id, request)
            .await
            .map_err(|e| {
                let err_str = e.to_string();
                if err_str.contains("Access Denied") || err_str.contains("Permission") {
                    QueryError::AuthenticationError(err_str)
                } else {
                    QueryError::QueryFailed(err_str)
                }
            })?;

        let mut rs = gcp_bigquery_client::model::query_response::ResultSet::new_from_query_response(
            query_response,
        );

        let mut rows = Vec::new();
        while rs.next_row() {
            let mut row = Vec::with_capacity(rs.column_count());
            for col_index in 0..rs.column_count() {
                let cell = rs.get_json_value(col_index).map_err(|e| {
                    QueryError::InvalidResponse(format!(
                        "Failed to read column {}: {}",
                        col_index, e
                    ))
                })?;

                row.push(match cell {
                    Some(value) => QueryValue::from_json(&value),
                    None => QueryValue::Null,
                });
            }
            rows.push(row);
        }

        Ok(rows)
    }

    #[cfg(not(feature = "bigquery"))]
    async fn query(&self, _sql: &str) -> Result<Vec<Row>, QueryError> {
        Err(QueryError::ConfigError(
            "BigQuery support not compiled. Rebuild with: cargo build --features bigquery"
                .to_string(),
        ))
    }

    #[cfg(feature = "bigquery")]
    async fn test_connection(&self) -> Result<(), QueryError> {
        // Simple query to test connection
        let request = QueryRequest::new("SELECT 1".to_string());

        self.client
            .job()
            .query(&self.project_id, request)
            .await
            .map_err(|e| QueryError::QueryFailed(format!("Connection test failed: {}", e)))?;

        Ok(())
    }

    #[cfg(not(feature = "bigquery"))]
    async fn test_connection(&self) -> Result<(), QueryError> {
        Err(QueryError::ConfigError(
            "BigQuery support not compiled. Rebuild with: cargo build --features bigquery"
                .to_string(),
        ))
    }
}
