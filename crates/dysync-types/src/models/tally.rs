//! Per-job results and run-level counters.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Identity, SyncMode};
use crate::error::StoreError;

/// Outcome of one write or delete job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub identity: Identity,
    pub error: Option<StoreError>,
    /// Whether a mutating primitive was actually invoked (false under dry run)
    pub mutated: bool,
}

impl JobResult {
    pub fn applied(identity: Identity) -> Self {
        Self { identity, error: None, mutated: true }
    }

    pub fn simulated(identity: Identity) -> Self {
        Self { identity, error: None, mutated: false }
    }

    pub fn failed(identity: Identity, error: StoreError) -> Self {
        Self { identity, error: Some(error), mutated: true }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate counters for a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTally {
    pub copied: usize,
    pub copy_failed: usize,
    pub deleted: usize,
    pub delete_failed: usize,
    /// Items left alone because their key could not be read
    pub skipped: usize,
}

impl RunTally {
    pub fn record_copy(&mut self, result: &JobResult) {
        if result.succeeded() {
            self.copied += 1;
        } else {
            self.copy_failed += 1;
        }
    }

    pub fn record_delete(&mut self, result: &JobResult) {
        if result.succeeded() {
            self.deleted += 1;
        } else {
            self.delete_failed += 1;
        }
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Fold the counters of another phase into this one.
    pub fn merge(&mut self, other: &RunTally) {
        self.copied += other.copied;
        self.copy_failed += other.copy_failed;
        self.deleted += other.deleted;
        self.delete_failed += other.delete_failed;
        self.skipped += other.skipped;
    }

    pub fn has_failures(&self) -> bool {
        self.copy_failed > 0 || self.delete_failed > 0
    }
}

impl fmt::Display for RunTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "synced={}, failed={}, deleted={}, failed={}",
            self.copied, self.copy_failed, self.deleted, self.delete_failed
        )?;
        if self.skipped > 0 {
            write!(f, ", skipped={}", self.skipped)?;
        }
        Ok(())
    }
}

/// Final report of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub table: String,
    pub mode: SyncMode,
    pub dry_run: bool,
    pub tally: RunTally,
    pub elapsed_ms: u64,
}
