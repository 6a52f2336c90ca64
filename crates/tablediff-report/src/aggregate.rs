//! Result aggregation
//!
//! Turns the merged check results into one Markdown report. Formatting is
//! selected per check through [`CheckFormat`]: the two standard checks get
//! dedicated layouts, every other check name falls back to a generic
//! tabular dump.

use crate::{BULLET, INDENTED_BULLET, NEW_LINE};
use tablediff_checks::{CheckResult, TableCheckResult};
use tablediff_query::Row;

/// Marker strings emitted by the standard column-count check
const ONLY_IN_DEV: &str = "Column only found in Dev";
const ONLY_IN_PROD: &str = "Column only found in Prod";

/// Errors raised when a check's result rows violate the formatter contract
#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error(
        "Row-count result for table {table} has {found} values per row; expected at least 4"
    )]
    MalformedRowCountRow { table: String, found: usize },

    #[error("Row-count result for table {table} has a non-numeric diff value")]
    NonNumericDiff { table: String },
}

/// Formatting policy for one check, selected by check file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckFormat {
    /// Markdown table of dev/prod counts and their percentage diff
    RowCount,

    /// Nested bullets naming dev-only and prod-only columns
    ColumnCount,

    /// Bullet per table with raw comma-joined result rows
    Generic,
}

impl CheckFormat {
    /// Select the format for a check by its file name; unknown names use
    /// the generic format.
    pub fn for_check(name: &str) -> Self {
        match name {
            "check_table_row_count.sql" => CheckFormat::RowCount,
            "check_table_column_count.sql" => CheckFormat::ColumnCount,
            _ => CheckFormat::Generic,
        }
    }
}

/// One parsed row of the row-count check
struct RowCountEntry<'a> {
    dev_count: &'a tablediff_query::QueryValue,
    prod_count: &'a tablediff_query::QueryValue,
    diff_ratio: f64,
}

impl<'a> RowCountEntry<'a> {
    /// The row-count template yields at least four positional values with
    /// the dev/prod count ratio difference in position 3.
    fn parse(table: &str, row: &'a Row) -> Result<Self, AggregateError> {
        if row.len() < 4 {
            return Err(AggregateError::MalformedRowCountRow {
                table: table.to_string(),
                found: row.len(),
            });
        }

        let diff_ratio = row[3].as_f64().ok_or_else(|| AggregateError::NonNumericDiff {
            table: table.to_string(),
        })?;

        Ok(Self {
            dev_count: &row[0],
            prod_count: &row[1],
            diff_ratio,
        })
    }
}

/// Render all check results into one Markdown report.
///
/// The report opens with a bullet list of failing check names in result
/// order, followed by one section per check. Returns an empty string when
/// there are no results; the comment composer substitutes its placeholder
/// in that case.
pub fn aggregate(results: &[CheckResult]) -> Result<String, AggregateError> {
    if results.is_empty() {
        return Ok(String::new());
    }

    let names: Vec<&str> = results.iter().map(|check| check.name.as_str()).collect();
    let mut output = format!("**Failures:**{}{}", BULLET, names.join(BULLET));

    for check in results {
        match CheckFormat::for_check(&check.name) {
            CheckFormat::RowCount => render_row_count(&mut output, check)?,
            CheckFormat::ColumnCount => render_column_count(&mut output, check),
            CheckFormat::Generic => render_generic(&mut output, check),
        }
    }

    Ok(output)
}

fn render_row_count(output: &mut String, check: &CheckResult) -> Result<(), AggregateError> {
    output.push_str(&format!("{}{}**Test:** {}", NEW_LINE, NEW_LINE, check.name));
    output.push_str(&format!("{}| Table Name | Dev Count | Prod Count | Diff % |", NEW_LINE));
    output.push_str(&format!("{}| --- | --- | --- | --- |", NEW_LINE));

    // Sort descending by the first row's diff ratio; all rows render.
    let mut tables: Vec<(&TableCheckResult, f64)> = Vec::with_capacity(check.tables.len());
    for table in &check.tables {
        let first = table
            .rows
            .first()
            .map(|row| RowCountEntry::parse(&table.table, row))
            .transpose()?
            .map(|entry| entry.diff_ratio)
            .unwrap_or(0.0);
        tables.push((table, first));
    }
    tables.sort_by(|a, b| b.1.total_cmp(&a.1));

    for (table, _) in tables {
        for row in &table.rows {
            let entry = RowCountEntry::parse(&table.table, row)?;
            output.push_str(&format!(
                "{}| {} | {} | {} | {:.2}% |",
                NEW_LINE,
                table.table,
                entry.dev_count,
                entry.prod_count,
                entry.diff_ratio * 100.0
            ));
        }
    }

    Ok(())
}

fn render_column_count(output: &mut String, check: &CheckResult) {
    output.push_str(&format!("{}{}**Test:** {}", NEW_LINE, NEW_LINE, check.name));

    for table in &check.tables {
        output.push_str(&format!("{}{}.{}", BULLET, table.compare_schema, table.table));

        let mut only_dev = Vec::new();
        let mut only_prod = Vec::new();
        for row in &table.rows {
            let marker = row.first().and_then(|v| v.as_str());
            let column = row.get(1).map(|v| v.to_string()).unwrap_or_default();
            match marker {
                Some(ONLY_IN_DEV) => only_dev.push(column),
                Some(ONLY_IN_PROD) => only_prod.push(column),
                _ => {}
            }
        }

        if !only_dev.is_empty() {
            output.push_str(&format!(
                "{}Columns only found in {}: {}",
                INDENTED_BULLET,
                table.dev_schema,
                only_dev.join(",")
            ));
        }
        if !only_prod.is_empty() {
            output.push_str(&format!(
                "{}Columns only found in {}: {}",
                INDENTED_BULLET,
                table.compare_schema,
                only_prod.join(",")
            ));
        }
    }
}

fn render_generic(output: &mut String, check: &CheckResult) {
    output.push_str(&format!("{}{}**Custom Test:** {}", NEW_LINE, NEW_LINE, check.name));

    for table in &check.tables {
        output.push_str(&format!("{}{}.{}", BULLET, table.compare_schema, table.table));
        for row in &table.rows {
            let values: Vec<String> = row.iter().map(|value| value.to_string()).collect();
            output.push_str(&format!("{}Results: {}", INDENTED_BULLET, values.join(",")));
        }
    }
}
