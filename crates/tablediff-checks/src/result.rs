//! Check result structures

use serde::{Deserialize, Serialize};
use tablediff_query::Row;

/// Drift detected by one check against one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCheckResult {
    /// Table name
    pub table: String,

    /// Dev schema the check ran against
    pub dev_schema: String,

    /// Production-comparison schema
    pub compare_schema: String,

    /// Result rows; always non-empty (empty results mean "no drift" and
    /// are filtered out by the runner)
    pub rows: Vec<Row>,
}

/// All drift detected by one check, keyed by the check's file name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Check identity: the template file name (e.g. "check_table_row_count.sql")
    pub name: String,

    /// Per-table results, in table resolution order
    pub tables: Vec<TableCheckResult>,
}

/// Merge standard and custom check results.
///
/// A custom check with the same name replaces the standard one in place;
/// new custom checks are appended after the standard set, preserving
/// discovery order on both sides.
pub fn merge_results(standard: Vec<CheckResult>, custom: Vec<CheckResult>) -> Vec<CheckResult> {
    let mut merged = standard;
    for check in custom {
        match merged.iter_mut().find(|existing| existing.name == check.name) {
            Some(existing) => *existing = check,
            None => merged.push(check),
        }
    }
    merged
}
