//! Typed error definitions for dysync.
//!
//! Errors are split by how the engine reacts to them:
//!
//! - **Fatal** ([`ConfigError`], [`SchemaError`], [`StoreError::Fetch`]) abort the run
//! - **Per item** ([`StoreError::Write`], [`StoreError::Delete`], [`ItemError`]) are
//!   logged, counted, and the pipeline moves on

mod config;
mod item;
mod schema;
mod store;

pub use config::ConfigError;
pub use item::ItemError;
pub use schema::SchemaError;
pub use store::StoreError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type that wraps all domain-specific errors.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "domain", content = "error")]
pub enum SyncError {
    /// Invalid run configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Key schema could not be resolved
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Table primitive failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Item could not be identified
    #[error("Item error: {0}")]
    Item(#[from] ItemError),
}

impl SyncError {
    /// Check if this error aborts the whole run.
    pub const fn is_fatal(&self) -> bool {
        match self {
            Self::Config(_) | Self::Schema(_) => true,
            Self::Store(e) => e.is_fatal(),
            Self::Item(_) => false,
        }
    }
}

/// Standard Result type using SyncError.
pub type Result<T> = std::result::Result<T, SyncError>;
