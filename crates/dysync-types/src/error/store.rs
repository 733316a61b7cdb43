//! Table primitive errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by the storage primitives.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum StoreError {
    /// DescribeTable failed
    #[error("describe {table} failed: {message}")]
    Describe { table: String, message: String },

    /// Scan, query or point lookup failed
    #[error("fetch from {table} failed: {message}")]
    Fetch { table: String, message: String },

    /// Single-item write failed
    #[error("put into {table} failed: {message}")]
    Write { table: String, message: String },

    /// Single-item delete failed
    #[error("delete from {table} failed: {message}")]
    Delete { table: String, message: String },
}

impl StoreError {
    /// Fetch and describe failures abort the run; a partial item list is never authoritative.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Describe { .. } | Self::Fetch { .. })
    }

    /// Table the failing primitive targeted.
    pub fn table(&self) -> &str {
        match self {
            Self::Describe { table, .. }
            | Self::Fetch { table, .. }
            | Self::Write { table, .. }
            | Self::Delete { table, .. } => table,
        }
    }
}
