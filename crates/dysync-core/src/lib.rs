//! # dysync Core
//!
//! Concurrent reconciliation engine that makes a destination table converge
//! to the contents of a source table.
//!
//! ```text
//! dysync-core/src/
//! ├── engine/           # schema → fetch → copy → reconcile
//! │   ├── identity.rs   # item → Identity
//! │   ├── fetch.rs      # full scan vs. filtered lookup
//! │   ├── pool.rs       # semaphore-bounded JoinSet
//! │   ├── gate.rs       # dry-run gate on puts/deletes
//! │   ├── copy.rs       # copy pipeline
//! │   └── reconcile.rs  # set difference + delete pipeline
//! ├── store/            # TableStore trait, DynamoDB backend, in-memory test double
//! └── session.rs        # per-side credentials, role assumption
//! ```

pub mod engine;
pub mod session;
pub mod store;

pub use engine::SyncEngine;
pub use session::{connect, Side};
pub use store::{DynamoTable, Item, TableStore};

#[cfg(any(test, feature = "test-util"))]
pub use store::MemoryTable;
