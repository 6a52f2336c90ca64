//! Typed values returned by the query service

use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of a tabular query result
pub type Row = Vec<QueryValue>;

/// A single cell value from a query result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl QueryValue {
    /// Decode a JSON cell into a typed value.
    ///
    /// The BigQuery REST API returns every scalar as a JSON string, so
    /// string cells are re-parsed: boolean literals first, then integers,
    /// then floats, falling back to a plain string.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => QueryValue::Null,
            serde_json::Value::Bool(b) => QueryValue::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    QueryValue::Int(i)
                } else {
                    QueryValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Self::from_cell_str(s),
            other => QueryValue::String(other.to_string()),
        }
    }

    fn from_cell_str(s: &str) -> Self {
        match s {
            "true" => QueryValue::Bool(true),
            "false" => QueryValue::Bool(false),
            _ => {
                if let Ok(i) = s.parse::<i64>() {
                    QueryValue::Int(i)
                } else if let Ok(f) = s.parse::<f64>() {
                    QueryValue::Float(f)
                } else {
                    QueryValue::String(s.to_string())
                }
            }
        }
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            QueryValue::Int(i) => Some(*i as f64),
            QueryValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// String view of the value, if it is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Null => write!(f, "null"),
            QueryValue::Bool(b) => write!(f, "{}", b),
            QueryValue::Int(i) => write!(f, "{}", i),
            QueryValue::Float(v) => write!(f, "{}", v),
            QueryValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::String(s.to_string())
    }
}

impl From<i64> for QueryValue {
    fn from(i: i64) -> Self {
        QueryValue::Int(i)
    }
}

impl From<f64> for QueryValue {
    fn from(f: f64) -> Self {
        QueryValue::Float(f)
    }
}
