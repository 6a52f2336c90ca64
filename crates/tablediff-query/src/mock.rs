//! Mock query client for testing
//!
//! Replays predefined result sets without connecting to any warehouse.
//! Useful for unit testing the check runner and the end-to-end pipeline,
//! and for simulating error conditions.

use crate::client::{QueryClient, QueryError};
use crate::value::Row;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Mock query client
///
/// Responses are registered as (pattern, rows) pairs; a query returns the
/// rows of the first pattern contained in its SQL text, or an empty result
/// when nothing matches. Every submitted query is recorded for assertions.
pub struct MockQueryClient {
    /// Registered responses, matched by substring in registration order
    responses: Vec<(String, Vec<Row>)>,

    /// SQL text of every query submitted so far
    queries: Arc<RwLock<Vec<String>>>,

    /// Fail every query with this error
    query_error: Option<QueryError>,

    /// Simulate connection failure
    fail_connection: bool,
}

impl MockQueryClient {
    /// Create a new mock client with no registered responses
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            queries: Arc::new(RwLock::new(Vec::new())),
            query_error: None,
            fail_connection: false,
        }
    }

    /// Register rows to return for any query containing `pattern`
    pub fn with_response(mut self, pattern: impl Into<String>, rows: Vec<Row>) -> Self {
        self.responses.push((pattern.into(), rows));
        self
    }

    /// Configure every query to fail with the given error
    pub fn with_query_error(mut self, error: QueryError) -> Self {
        self.query_error = Some(error);
        self
    }

    /// Configure to fail all connection tests
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    /// Get all SQL queries submitted so far
    pub async fn executed_queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }
}

impl Default for MockQueryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MockQueryClient {
    fn clone(&self) -> Self {
        Self {
            responses: self.responses.clone(),
            queries: Arc::clone(&self.queries),
            query_error: self.query_error.clone(),
            fail_connection: self.fail_connection,
        }
    }
}

#[async_trait::async_trait]
impl QueryClient for MockQueryClient {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn query(&self, sql: &str) -> Result<Vec<Row>, QueryError> {
        self.queries.write().await.push(sql.to_string());

        if let Some(error) = &self.query_error {
            return Err(error.clone());
        }

        let rows = self
            .responses
            .iter()
            .find(|(pattern, _)| sql.contains(pattern.as_str()))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default();

        Ok(rows)
    }

    async fn test_connection(&self) -> Result<(), QueryError> {
        if self.fail_connection {
            Err(QueryError::NetworkError(
                "Simulated connection failure".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::QueryValue;

    #[tokio::test]
    async fn returns_registered_rows_on_match() {
        let client = MockQueryClient::new()
            .with_response("dev_sales.orders", vec![vec![QueryValue::Int(1)]]);

        let rows = client.query("SELECT * FROM dev_sales.orders").await.unwrap();
        assert_eq!(rows, vec![vec![QueryValue::Int(1)]]);
    }

    #[tokio::test]
    async fn unmatched_query_returns_empty() {
        let client = MockQueryClient::new()
            .with_response("dev_sales.orders", vec![vec![QueryValue::Int(1)]]);

        let rows = client.query("SELECT * FROM dev_sales.customers").await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn records_executed_queries() {
        let client = MockQueryClient::new();
        client.query("SELECT 1").await.unwrap();
        client.query("SELECT 2").await.unwrap();

        assert_eq!(client.executed_queries().await, vec!["SELECT 1", "SELECT 2"]);
    }

    #[tokio::test]
    async fn configured_error_propagates() {
        let client = MockQueryClient::new()
            .with_query_error(QueryError::QueryFailed("syntax error".to_string()));

        let result = client.query("SELECT 1").await;
        assert!(matches!(result, Err(QueryError::QueryFailed(_))));
    }

    #[tokio::test]
    async fn connection_failure() {
        let client = MockQueryClient::new().with_connection_failure();
        assert!(matches!(
            client.test_connection().await,
            Err(QueryError::NetworkError(_))
        ));

        let client = MockQueryClient::new();
        assert!(client.test_connection().await.is_ok());
    }
}
