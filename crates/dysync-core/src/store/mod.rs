//! Table store abstraction.
//!
//! The engine only talks to tables through [`TableStore`]. `DynamoTable` is the
//! production backend; `MemoryTable` (feature `test-util`) backs the tests.

mod dynamo;
#[cfg(any(test, feature = "test-util"))]
mod memory;

pub use dynamo::DynamoTable;
#[cfg(any(test, feature = "test-util"))]
pub use memory::{string_item, MemoryTable};

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;

use dysync_types::{Identity, ItemFilter, KeyElement, KeySchema, StoreError};

/// A table item: attribute name to typed value.
pub type Item = HashMap<String, AttributeValue>;

/// Primitive table operations the engine depends on.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Key schema entries of `table`, in declaration order.
    async fn describe_key_schema(&self, table: &str) -> Result<Vec<KeyElement>, StoreError>;

    /// Every item in `table`. Fails as a whole if any page fails.
    async fn scan_all(&self, table: &str) -> Result<Vec<Item>, StoreError>;

    /// Items matching a non-empty identity filter.
    async fn get_filtered(
        &self,
        table: &str,
        schema: &KeySchema,
        filter: &ItemFilter,
    ) -> Result<Vec<Item>, StoreError>;

    /// Write `item`, replacing any item with the same key.
    async fn put(&self, table: &str, item: Item) -> Result<(), StoreError>;

    /// Remove the item addressed by `identity`.
    async fn delete(
        &self,
        table: &str,
        schema: &KeySchema,
        identity: &Identity,
    ) -> Result<(), StoreError>;
}

/// Lookup shape selected by an identity filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterQuery {
    /// All items sharing a hash key value
    Partition { hash: String },
    /// Items whose range key equals a value, across all partitions
    RangeEquals { range_attribute: String, value: String },
    /// The single item with this key
    Point(Identity),
}

impl FilterQuery {
    /// Map a filter onto a lookup for `schema`.
    ///
    /// Returns `Ok(None)` for an empty filter. A range filter on a hash-only
    /// table cannot be answered and is a fetch error.
    pub fn resolve(
        table: &str,
        schema: &KeySchema,
        filter: &ItemFilter,
    ) -> Result<Option<Self>, StoreError> {
        let needs_range = || StoreError::Fetch {
            table: table.to_string(),
            message: format!("--sk filter requires a RANGE key, table key schema is {schema}"),
        };

        match (&filter.id, &filter.sk) {
            (None, None) => Ok(None),
            (Some(hash), None) => Ok(Some(Self::Partition { hash: hash.clone() })),
            (None, Some(value)) => {
                let range_attribute = schema.range_attribute.clone().ok_or_else(needs_range)?;
                Ok(Some(Self::RangeEquals { range_attribute, value: value.clone() }))
            },
            (Some(hash), Some(range)) => {
                if !schema.is_composite() {
                    return Err(needs_range());
                }
                Ok(Some(Self::Point(Identity::composite(hash.clone(), range.clone()))))
            },
        }
    }
}

/// Key attribute map addressing `identity` under `schema`.
///
/// `None` when the identity's shape does not match the schema.
pub fn key_attributes(schema: &KeySchema, identity: &Identity) -> Option<Item> {
    let (hash, range) = identity.parts();
    let mut key = HashMap::with_capacity(2);
    key.insert(schema.hash_attribute.clone(), AttributeValue::S(hash.to_string()));

    match (&schema.range_attribute, range) {
        (Some(attribute), Some(value)) => {
            key.insert(attribute.clone(), AttributeValue::S(value.to_string()));
        },
        (None, None) => {},
        _ => return None,
    }
    Some(key)
}
