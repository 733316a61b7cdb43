//! Core domain models for dysync.

mod config;
mod identity;
mod schema;
mod tally;

// Re-export all models
pub use config::{
    default_concurrency, AccountCredentials, ItemFilter, SyncConfig, SyncMode, SyncPlan,
    FALLBACK_CONCURRENCY,
};
pub use identity::{Identity, SourceIdentitySet};
pub use schema::{KeyElement, KeySchema, KeyType};
pub use tally::{JobResult, RunTally, SyncReport};
