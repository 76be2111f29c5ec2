use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Scalar literal attached to leaf-like nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Str(value.to_string())
    }
}

/// One flattened AST node. Ids are assigned in pre-order starting at 0, so
/// every id in `children` is strictly greater than `id` and the full
/// sequence reconstructs the tree from `id` and `children` alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: usize,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ScalarValue>,
    pub children: Vec<usize>,
}

/// Why a file was excluded from the accepted outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    ParseFailed(String),
    TooFewNodes(usize),
    TooManyNodes(usize),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::ParseFailed(message) => write!(f, "{message}"),
            RejectReason::TooFewNodes(_) => write!(f, "too few nodes"),
            RejectReason::TooManyNodes(_) => write!(f, "too many nodes"),
        }
    }
}

/// Tagged result of processing one file in batch mode.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Accepted {
        path: PathBuf,
        records: Vec<NodeRecord>,
    },
    Rejected {
        path: PathBuf,
        reason: RejectReason,
    },
}

/// Aggregate counters for one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
}
