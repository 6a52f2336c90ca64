//! Query-service access
//!
//! This crate isolates everything that talks to the warehouse behind the
//! narrow [`QueryClient`] trait:
//! - Typed row values ([`QueryValue`]) decoded from query responses
//! - A BigQuery implementation (behind the `bigquery` cargo feature)
//! - A mock client for testing without credentials

pub mod bigquery;
pub mod client;
pub mod mock;
pub mod value;

pub use bigquery::BigQueryRunner;
pub use client::{QueryClient, QueryError};
pub use mock::MockQueryClient;
pub use value::{QueryValue, Row};
