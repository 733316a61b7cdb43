//! Key schema resolution errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::KeyType;

/// Errors that prevent the engine from learning which attributes form the key.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum SchemaError {
    /// Table metadata could not be retrieved
    #[error("failed to describe table {table}: {message}")]
    Describe {
        /// Table that was described
        table: String,
        /// Underlying failure
        message: String,
    },

    /// Key schema has no HASH entry
    #[error("table {table} has no HASH key")]
    MissingHashKey {
        /// Table whose schema was incomplete
        table: String,
    },

    /// Key schema lists the same role more than once
    #[error("table {table} declares more than one {key_type} key")]
    DuplicateKey {
        /// Table whose schema was inconsistent
        table: String,
        /// Role that appeared twice
        key_type: KeyType,
    },
}
