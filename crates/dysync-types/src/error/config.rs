//! Configuration-related errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while validating a run configuration, before any I/O.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ConfigError {
    /// No table name was supplied
    #[error("table cannot be empty")]
    MissingTable,

    /// Source and destination would authenticate as the same principal
    #[error(
        "cannot use the same credentials for source and destination \
         (give the destination its own keys or role)"
    )]
    SameCredentials,

    /// A field failed validation
    #[error("Config validation error for {field}: {message}")]
    ValidationError {
        /// Name of the field that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },
}

impl ConfigError {
    /// Build a validation error from `validator` output.
    pub fn from_validation_errors(errors: &validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> =
            errors.field_errors().keys().map(|field| field.to_string()).collect();
        fields.sort();

        Self::ValidationError { field: fields.join(", "), message: errors.to_string() }
    }
}
