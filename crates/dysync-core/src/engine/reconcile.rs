//! Reconciliation pipeline: delete destination items absent from source.

use tracing::{debug, error, info, warn};

use dysync_types::{Identity, JobResult, KeySchema, RunTally, SourceIdentitySet, StoreError};

use super::gate::DryRunGate;
use super::identity;
use super::pool::WorkerPool;
use crate::store::{Item, TableStore};

/// Set difference between a destination scan and the source identities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionPlan {
    /// Destination identities with no counterpart in source
    pub doomed: Vec<Identity>,
    /// Destination items also present in source
    pub retained: usize,
    /// Destination items whose key could not be read
    pub skipped: usize,
}

/// Compute which destination items must go.
pub fn plan_deletions(
    destination_items: &[Item],
    schema: &KeySchema,
    source: &SourceIdentitySet,
) -> DeletionPlan {
    let mut plan = DeletionPlan::default();

    for item in destination_items {
        match identity::encode(item, schema) {
            Ok(identity) if source.contains(&identity) => plan.retained += 1,
            Ok(identity) => plan.doomed.push(identity),
            Err(e) => {
                warn!("Skipping destination item: {}", e);
                plan.skipped += 1;
            },
        }
    }

    plan
}

/// Scan the destination and delete every item whose identity is not in `source`.
///
/// Must only be called once the copy phase has fully settled. A failed scan
/// aborts the phase before any delete is issued.
pub async fn reconcile(
    destination: &dyn TableStore,
    table: &str,
    source: &SourceIdentitySet,
    gate: &DryRunGate,
    concurrency: usize,
) -> Result<RunTally, StoreError> {
    info!(table, "Scanning destination for items absent from source");
    let destination_items = destination.scan_all(table).await?;

    let plan = plan_deletions(&destination_items, gate.schema(), source);
    drop(destination_items);
    info!(
        table,
        scheduled = plan.doomed.len(),
        retained = plan.retained,
        skipped = plan.skipped,
        "Computed destination difference"
    );

    let mut tally = RunTally { skipped: plan.skipped, ..RunTally::default() };
    let mut pool: WorkerPool<JobResult> = WorkerPool::new(concurrency);

    for identity in plan.doomed {
        let worker = gate.clone();
        pool.submit(async move {
            let result = worker.delete(identity).await;
            match &result.error {
                None => info!("{}delete: {}", worker.prefix(), result.identity),
                Some(e) => warn!("{}delete failed: {}: {}", worker.prefix(), result.identity, e),
            }
            result
        })
        .await;
    }

    let submitted = pool.submitted();
    for joined in pool.drain().await {
        match joined {
            Ok(result) => tally.record_delete(&result),
            Err(e) => {
                error!("Delete worker panicked: {}", e);
                tally.delete_failed += 1;
            },
        }
    }
    debug!(
        submitted,
        deleted = tally.deleted,
        failed = tally.delete_failed,
        "Delete pipeline settled"
    );

    Ok(tally)
}
