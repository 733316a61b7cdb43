//! Dry-run gate around the mutating primitives.

use std::sync::Arc;

use dysync_types::{Identity, JobResult, KeySchema};

use crate::store::{Item, TableStore};

const DRY_RUN_PREFIX: &str = "[dryrun] ";

/// Routes every put and delete against the destination.
///
/// When dry run is active no primitive is called and each job reports
/// success with `mutated = false`, so counters match a live run.
#[derive(Clone)]
pub struct DryRunGate {
    store: Arc<dyn TableStore>,
    table: Arc<str>,
    schema: Arc<KeySchema>,
    dry_run: bool,
}

impl DryRunGate {
    pub fn new(store: Arc<dyn TableStore>, table: &str, schema: KeySchema, dry_run: bool) -> Self {
        Self { store, table: Arc::from(table), schema: Arc::new(schema), dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Marker prepended to per-item log lines.
    pub fn prefix(&self) -> &'static str {
        if self.dry_run {
            DRY_RUN_PREFIX
        } else {
            ""
        }
    }

    pub fn schema(&self) -> &KeySchema {
        &self.schema
    }

    pub async fn put(&self, identity: Identity, item: Item) -> JobResult {
        if self.dry_run {
            return JobResult::simulated(identity);
        }
        match self.store.put(&self.table, item).await {
            Ok(()) => JobResult::applied(identity),
            Err(e) => JobResult::failed(identity, e),
        }
    }

    pub async fn delete(&self, identity: Identity) -> JobResult {
        if self.dry_run {
            return JobResult::simulated(identity);
        }
        match self.store.delete(&self.table, &self.schema, &identity).await {
            Ok(()) => JobResult::applied(identity),
            Err(e) => JobResult::failed(identity, e),
        }
    }
}
