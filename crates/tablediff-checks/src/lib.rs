//! Check execution
//!
//! Loads a directory of parameterized SQL check templates, renders each one
//! against every resolved table, submits the rendered queries, and keeps
//! only the (check, table) pairs whose result sets are non-empty.

pub mod result;
pub mod runner;

pub use result::{merge_results, CheckResult, TableCheckResult};
pub use runner::{CheckError, CheckRunner};
