//! # dysync Types
//!
//! Core types and error definitions shared by the dysync engine and CLI.
//!
//! - **`error`** - Typed error hierarchy for configuration, schema, store and item failures
//! - **`models`** - Key schema, item identity, run configuration and tallies
//!
//! ## Architecture Role
//!
//! `dysync-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!        dysync-types (this crate)
//!                │
//!                ▼
//!           dysync-core
//!                │
//!                ▼
//!             dysync
//! ```
//!
//! Nothing in here performs I/O. Everything the engine decides before touching
//! a table (schema resolution, identity, mode selection) lives here so it can
//! be tested without a store.

pub mod error;
pub mod models;

// Re-export error types for convenience
pub use error::{ConfigError, ItemError, Result, SchemaError, StoreError, SyncError};

// Re-export core model types
pub use models::{
    default_concurrency, AccountCredentials, Identity, ItemFilter, JobResult, KeyElement,
    KeySchema, KeyType, RunTally, SourceIdentitySet, SyncConfig, SyncMode, SyncPlan, SyncReport,
};
