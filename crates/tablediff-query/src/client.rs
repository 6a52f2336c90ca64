//! Query client trait

use crate::value::Row;

/// Errors that can occur when running a query
#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryError {
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Trait for clients that can submit a fully rendered query and return a
/// tabular result.
///
/// An empty row set is the "no drift" sentinel: callers drop empty results
/// rather than reporting them.
#[async_trait::async_trait]
pub trait QueryClient: Send + Sync {
    /// Get the client name (e.g., "BigQuery")
    fn name(&self) -> &'static str;

    /// Submit a rendered SQL query and collect all result rows
    async fn query(&self, sql: &str) -> Result<Vec<Row>, QueryError>;

    /// Test the connection to the query service
    ///
    /// This is useful for validating credentials before running a full
    /// batch of checks.
    async fn test_connection(&self) -> Result<(), QueryError>;
}
