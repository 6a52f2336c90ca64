//! Schema-prefix policy
//!
//! Dev and prod hold the same tables under parallel schema names that
//! differ only by a naming prefix. A handful of "irregular" schemas do not
//! follow the standard prefix swap in production and use a fallback prefix
//! instead.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Prefix-translation rules, constructed once from CLI flags and passed by
/// reference into each pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaPrefixPolicy {
    /// Prefix used by development schemas (e.g. "dev_")
    pub dev_prefix: String,

    /// Prefix used by production schemas (e.g. "prod_")
    pub prod_prefix: String,

    /// Prefix used in production by irregular schemas only
    pub fallback_prefix: String,

    /// Dev schemas whose production counterpart uses `fallback_prefix`
    pub irregular_schemas: HashSet<String>,

    /// Dev schemas to skip entirely (their models only exist in dev)
    pub ignored_schemas: HashSet<String>,
}

impl SchemaPrefixPolicy {
    pub fn new(
        dev_prefix: impl Into<String>,
        prod_prefix: impl Into<String>,
        fallback_prefix: impl Into<String>,
    ) -> Self {
        Self {
            dev_prefix: dev_prefix.into(),
            prod_prefix: prod_prefix.into(),
            fallback_prefix: fallback_prefix.into(),
            irregular_schemas: HashSet::new(),
            ignored_schemas: HashSet::new(),
        }
    }

    /// Add irregular schemas (builder style)
    pub fn with_irregular_schemas(mut self, schemas: impl IntoIterator<Item = String>) -> Self {
        self.irregular_schemas.extend(schemas);
        self
    }

    /// Add ignored schemas (builder style)
    pub fn with_ignored_schemas(mut self, schemas: impl IntoIterator<Item = String>) -> Self {
        self.ignored_schemas.extend(schemas);
        self
    }

    /// Whether a manifest schema should take part in comparisons
    pub fn is_candidate(&self, schema: &str) -> bool {
        schema.starts_with(&self.dev_prefix) && !self.ignored_schemas.contains(schema)
    }

    /// Compute the production-comparison schema for a dev schema.
    ///
    /// Replaces the first occurrence of `dev_prefix` with `prod_prefix`, or
    /// with `fallback_prefix` for irregular schemas. If `dev_prefix` does
    /// not occur in the name the schema is returned unchanged.
    pub fn compare_schema(&self, schema: &str) -> String {
        let replacement = if self.irregular_schemas.contains(schema) {
            &self.fallback_prefix
        } else {
            &self.prod_prefix
        };
        schema.replacen(&self.dev_prefix, replacement, 1)
    }
}
