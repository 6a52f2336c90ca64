//! PR comment composition

use crate::{BREAK_LINE, INDENTED_BULLET, NEW_LINE};

/// Placeholder used when no check produced any drift
const NO_RESULTS: &str = "**No Results to show**";

/// Wrap an aggregated report into the final comment body.
///
/// The comment always opens with a "Relevant Files Changed" section (header
/// only when the file list is empty), followed by the report or the
/// no-results placeholder.
pub fn compose_comment(report: &str, relevant_files: &[String]) -> String {
    let mut comment = format!("{}**Relevant Files Changed:**{}", BREAK_LINE, NEW_LINE);

    if !relevant_files.is_empty() {
        comment.push_str(INDENTED_BULLET);
        comment.push_str(&relevant_files.join(INDENTED_BULLET));
    }

    comment.push_str(BREAK_LINE);
    comment.push_str(if report.is_empty() { NO_RESULTS } else { report });
    comment
}
