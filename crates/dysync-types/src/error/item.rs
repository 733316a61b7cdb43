//! Per-item identity errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An item whose key attributes cannot be turned into an identity.
///
/// Recovered locally: the item is logged and skipped, the pipeline continues.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ItemError {
    /// Key attribute is absent from the item
    #[error("item is missing key attribute '{attribute}'")]
    MissingAttribute {
        /// Name of the absent key attribute
        attribute: String,
    },

    /// Key attribute is present but not a string
    #[error("key attribute '{attribute}' is not a string")]
    NotString {
        /// Name of the non-string key attribute
        attribute: String,
    },
}
