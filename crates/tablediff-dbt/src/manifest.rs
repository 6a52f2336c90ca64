//! dbt manifest.json parsing
//!
//! Parses dbt-generated manifest.json (subset of fields we care about) and
//! maps changed model files to their resolved table identities.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tablediff_core::{SchemaPrefixPolicy, TableRef};

/// dbt manifest.json structure (subset of fields we care about)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Model and test nodes
    pub nodes: HashMap<String, ManifestNode>,
}

/// A node in the manifest (model, test, snapshot, etc.)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestNode {
    /// Node name, which is also the output table name
    pub name: String,

    /// Path to the SQL file that defines the node
    pub original_file_path: String,

    /// Database name
    pub database: String,

    /// Schema name
    pub schema: String,
}

impl Manifest {
    /// Load manifest from file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ManifestError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_str(&contents)
    }

    /// Parse manifest from JSON string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(json).map_err(|e| ManifestError::ParseError(e.to_string()))
    }

    /// Resolve changed files to the tables they define.
    ///
    /// For each file, every node whose `original_file_path` matches it
    /// exactly contributes one table, provided its schema starts with the
    /// policy's dev prefix and is not ignored. Output order is file order
    /// outer, node-id order inner; duplicates are kept as-is.
    pub fn resolve_tables(&self, files: &[String], policy: &SchemaPrefixPolicy) -> Vec<TableRef> {
        // HashMap iteration order is arbitrary; sort by node id so the
        // resolved list (and everything downstream) is deterministic.
        let mut node_ids: Vec<&String> = self.nodes.keys().collect();
        node_ids.sort();

        let mut tables = Vec::new();
        for file in files {
            for node_id in &node_ids {
                let node = &self.nodes[*node_id];
                if &node.original_file_path == file && policy.is_candidate(&node.schema) {
                    tables.push(TableRef::new(&node.database, &node.schema, &node.name));
                }
            }
        }
        tables
    }
}

/// Manifest parsing errors
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read manifest file {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse manifest JSON: {0}")]
    ParseError(String),
}
