//! Report rendering
//!
//! Aggregates heterogeneous check results into one Markdown report and
//! wraps it into the comment text posted back to the pull request.

pub mod aggregate;
pub mod comment;

pub use aggregate::{aggregate, AggregateError, CheckFormat};
pub use comment::compose_comment;

// Markdown building blocks shared by the aggregator and the composer.
// The doubled trailing spaces force hard line breaks in GitHub comments.
pub(crate) const NEW_LINE: &str = "  \n";
pub(crate) const BULLET: &str = "  \n- ";
pub(crate) const INDENTED_BULLET: &str = "  \n\t- ";
pub(crate) const BREAK_LINE: &str = "  \n---  \n  \n";
