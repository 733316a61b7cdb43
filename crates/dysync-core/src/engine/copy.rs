//! Copy pipeline: push every source item into the destination.

use tracing::{debug, error, info, warn};

use dysync_types::{JobResult, RunTally, SourceIdentitySet};

use super::gate::DryRunGate;
use super::identity;
use super::pool::WorkerPool;
use crate::store::Item;

/// Result of the copy phase.
#[derive(Debug, Clone, Default)]
pub struct CopyOutcome {
    /// Identity of every well-formed source item, whether or not its write succeeded
    pub source_identities: SourceIdentitySet,
    pub tally: RunTally,
}

/// Write `items` to the destination behind `gate`, at most `concurrency` at a time.
///
/// The identity set is filled on the submitting side, so it never depends on
/// write outcomes. Returns only after every submitted job has settled.
pub async fn copy_items(items: Vec<Item>, gate: &DryRunGate, concurrency: usize) -> CopyOutcome {
    let mut source_identities = SourceIdentitySet::with_capacity(items.len());
    let mut tally = RunTally::default();
    let mut pool: WorkerPool<JobResult> = WorkerPool::new(concurrency);

    for item in items {
        let identity = match identity::encode(&item, gate.schema()) {
            Ok(identity) => identity,
            Err(e) => {
                warn!("Skipping source item: {}", e);
                tally.record_skipped();
                continue;
            },
        };

        if !source_identities.insert(identity.clone()) {
            debug!("Duplicate source identity: {}", identity);
        }

        let worker = gate.clone();
        pool.submit(async move {
            let result = worker.put(identity, item).await;
            match &result.error {
                None => info!("{}sync: {}", worker.prefix(), result.identity),
                Some(e) => warn!("{}sync failed: {}: {}", worker.prefix(), result.identity, e),
            }
            result
        })
        .await;
    }

    let submitted = pool.submitted();
    for joined in pool.drain().await {
        match joined {
            Ok(result) => tally.record_copy(&result),
            Err(e) => {
                error!("Copy worker panicked: {}", e);
                tally.copy_failed += 1;
            },
        }
    }
    debug!(
        submitted,
        copied = tally.copied,
        failed = tally.copy_failed,
        "Copy pipeline settled"
    );

    CopyOutcome { source_identities, tally }
}
