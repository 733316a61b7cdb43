//! Reconciliation engine.
//!
//! One run goes through the phases in strict order:
//!
//! ```text
//! describe source ─► resolve key schema ─► fetch source items
//!        ─► copy pipeline (builds source identity set)
//!        ─► reconcile pipeline (full sync only)
//! ```
//!
//! Each pipeline drains all of its jobs before the next phase starts.

pub mod copy;
pub mod fetch;
pub mod gate;
pub mod identity;
mod pool;
pub mod reconcile;

use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use dysync_types::{KeySchema, SchemaError, SyncError, SyncPlan, SyncReport};

use crate::store::TableStore;
use gate::DryRunGate;

/// Drives one source → destination run.
pub struct SyncEngine {
    source: Arc<dyn TableStore>,
    destination: Arc<dyn TableStore>,
    plan: SyncPlan,
}

impl SyncEngine {
    pub fn new(
        source: Arc<dyn TableStore>,
        destination: Arc<dyn TableStore>,
        plan: SyncPlan,
    ) -> Self {
        Self { source, destination, plan }
    }

    pub fn plan(&self) -> &SyncPlan {
        &self.plan
    }

    /// Resolve the key schema from the source table's metadata.
    pub async fn resolve_schema(&self) -> Result<KeySchema, SchemaError> {
        let table = &self.plan.table;
        let elements = self.source.describe_key_schema(table).await.map_err(|e| {
            SchemaError::Describe { table: table.clone(), message: e.to_string() }
        })?;
        KeySchema::resolve(table, &elements)
    }

    /// Execute the run and report aggregate counts.
    ///
    /// Per-item failures are counted, never returned. Schema and fetch
    /// failures abort the run.
    pub async fn run(&self) -> Result<SyncReport, SyncError> {
        let started = Instant::now();
        let plan = &self.plan;

        let schema = self.resolve_schema().await?;
        info!(
            table = %plan.table,
            key = %schema,
            mode = %plan.mode,
            dry_run = plan.dry_run,
            concurrency = plan.concurrency,
            "Starting sync"
        );
        if plan.forced_copy_only {
            info!("Identity filter supplied, running copy-only");
        }

        let items =
            fetch::select_source_items(self.source.as_ref(), &plan.table, &schema, &plan.filter)
                .await?;

        let gate =
            DryRunGate::new(Arc::clone(&self.destination), &plan.table, schema, plan.dry_run);
        let copied = copy::copy_items(items, &gate, plan.concurrency).await;
        let mut tally = copied.tally;
        info!(
            copied = tally.copied,
            failed = tally.copy_failed,
            skipped = tally.skipped,
            "Copy phase finished"
        );

        if plan.deletes_enabled() {
            let deleted = reconcile::reconcile(
                self.destination.as_ref(),
                &plan.table,
                &copied.source_identities,
                &gate,
                plan.concurrency,
            )
            .await?;
            tally.merge(&deleted);
        }

        Ok(SyncReport {
            table: plan.table.clone(),
            mode: plan.mode,
            dry_run: plan.dry_run,
            tally,
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        })
    }
}
