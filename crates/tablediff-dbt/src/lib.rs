//! dbt manifest handling
//!
//! Parses dbt-generated manifest.json and resolves the files changed in a
//! pull request to the concrete tables those files define.

pub mod manifest;
pub mod resolver;

pub use manifest::{Manifest, ManifestError, ManifestNode};
pub use resolver::relevant_files;
