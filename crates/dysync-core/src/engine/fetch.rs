//! Source fetch strategy selection.

use dysync_types::{ItemFilter, KeySchema, StoreError};

use crate::store::{Item, TableStore};

/// How source items are retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Scan the whole table; the result is the authoritative source set
    FullScan,
    /// Look up only the items matching the identity filter
    Targeted,
}

impl FetchStrategy {
    pub fn select(filter: &ItemFilter) -> Self {
        if filter.is_empty() {
            Self::FullScan
        } else {
            Self::Targeted
        }
    }
}

/// Fetch the source items the run will copy.
///
/// Any failure aborts: a partial item list must never be treated as the source set.
pub async fn select_source_items(
    store: &dyn TableStore,
    table: &str,
    schema: &KeySchema,
    filter: &ItemFilter,
) -> Result<Vec<Item>, StoreError> {
    let items = match FetchStrategy::select(filter) {
        FetchStrategy::FullScan => {
            tracing::warn!(
                table,
                "Scanning the full source table, this is slow and expensive for huge tables"
            );
            store.scan_all(table).await?
        },
        FetchStrategy::Targeted => {
            tracing::info!(
                table,
                id = ?filter.id,
                sk = ?filter.sk,
                "Fetching filtered source items"
            );
            store.get_filtered(table, schema, filter).await?
        },
    };

    tracing::info!(table, count = items.len(), "Fetched source items");
    Ok(items)
}
