//! In-process table store.
//!
//! Holds items keyed by identity and supports failure injection plus
//! bookkeeping of concurrent mutations, which is what the engine tests need.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use dysync_types::{Identity, ItemFilter, KeyElement, KeySchema, StoreError};

use super::{FilterQuery, Item, TableStore};
use crate::engine::identity;

/// Build an item whose attributes are all strings.
pub fn string_item(attributes: &[(&str, &str)]) -> Item {
    attributes
        .iter()
        .map(|(name, value)| ((*name).to_string(), AttributeValue::S((*value).to_string())))
        .collect()
}

/// In-memory table with a fixed key schema.
#[derive(Debug)]
pub struct MemoryTable {
    schema: KeySchema,
    items: Mutex<BTreeMap<Identity, Item>>,
    /// Items whose key cannot be read; returned by scans, never addressable
    unkeyed: Mutex<Vec<Item>>,
    failing_puts: Mutex<HashSet<Identity>>,
    failing_deletes: Mutex<HashSet<Identity>>,
    fail_describe: AtomicBool,
    fail_scans: AtomicBool,
    latency: Duration,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    mutations: AtomicUsize,
}

impl MemoryTable {
    pub fn new(schema: KeySchema) -> Self {
        Self {
            schema,
            items: Mutex::new(BTreeMap::new()),
            unkeyed: Mutex::new(Vec::new()),
            failing_puts: Mutex::new(HashSet::new()),
            failing_deletes: Mutex::new(HashSet::new()),
            fail_describe: AtomicBool::new(false),
            fail_scans: AtomicBool::new(false),
            latency: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            mutations: AtomicUsize::new(0),
        }
    }

    /// Seed the table. Items without a readable key are kept aside and only
    /// surface through scans.
    pub fn with_items(self, items: impl IntoIterator<Item = Item>) -> Self {
        for item in items {
            self.insert(item);
        }
        self
    }

    /// Delay every put and delete, so concurrent mutations overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn insert(&self, item: Item) {
        match identity::encode(&item, &self.schema) {
            Ok(identity) => {
                self.items.lock().insert(identity, item);
            },
            Err(_) => self.unkeyed.lock().push(item),
        }
    }

    pub fn fail_put_for(&self, identity: Identity) {
        self.failing_puts.lock().insert(identity);
    }

    pub fn fail_delete_for(&self, identity: Identity) {
        self.failing_deletes.lock().insert(identity);
    }

    pub fn fail_describe(&self) {
        self.fail_describe.store(true, Ordering::SeqCst);
    }

    pub fn fail_scans(&self) {
        self.fail_scans.store(true, Ordering::SeqCst);
    }

    /// Copy of the keyed contents.
    pub fn snapshot(&self) -> BTreeMap<Identity, Item> {
        self.items.lock().clone()
    }

    /// Identities currently stored, in key order.
    pub fn identities(&self) -> Vec<Identity> {
        self.items.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len() + self.unkeyed.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Highest number of puts and deletes observed in flight at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Number of put and delete calls received.
    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    async fn enter_mutation(&self) {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if self.latency.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn exit_mutation(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    fn scan_error(&self, table: &str) -> Option<StoreError> {
        self.fail_scans.load(Ordering::SeqCst).then(|| StoreError::Fetch {
            table: table.to_string(),
            message: "injected scan failure".to_string(),
        })
    }
}

#[async_trait]
impl TableStore for MemoryTable {
    async fn describe_key_schema(&self, table: &str) -> Result<Vec<KeyElement>, StoreError> {
        if self.fail_describe.load(Ordering::SeqCst) {
            return Err(StoreError::Describe {
                table: table.to_string(),
                message: "ResourceNotFoundException: injected".to_string(),
            });
        }

        let mut elements = vec![KeyElement::hash(self.schema.hash_attribute.clone())];
        if let Some(range) = &self.schema.range_attribute {
            elements.push(KeyElement::range(range.clone()));
        }
        Ok(elements)
    }

    async fn scan_all(&self, table: &str) -> Result<Vec<Item>, StoreError> {
        if let Some(err) = self.scan_error(table) {
            return Err(err);
        }

        let mut items: Vec<Item> = self.items.lock().values().cloned().collect();
        items.extend(self.unkeyed.lock().iter().cloned());
        Ok(items)
    }

    async fn get_filtered(
        &self,
        table: &str,
        schema: &KeySchema,
        filter: &ItemFilter,
    ) -> Result<Vec<Item>, StoreError> {
        let Some(query) = FilterQuery::resolve(table, schema, filter)? else {
            return self.scan_all(table).await;
        };
        if let Some(err) = self.scan_error(table) {
            return Err(err);
        }

        let items = self.items.lock();
        let matching = items
            .iter()
            .filter(|(identity, _)| match &query {
                FilterQuery::Partition { hash } => identity.hash() == hash,
                FilterQuery::RangeEquals { value, .. } => identity.range() == Some(value.as_str()),
                FilterQuery::Point(point) => *identity == point,
            })
            .map(|(_, item)| item.clone())
            .collect();
        Ok(matching)
    }

    async fn put(&self, table: &str, item: Item) -> Result<(), StoreError> {
        self.enter_mutation().await;

        let result = match identity::encode(&item, &self.schema) {
            Ok(identity) if self.failing_puts.lock().contains(&identity) => Err(StoreError::Write {
                table: table.to_string(),
                message: format!("injected put failure for {identity}"),
            }),
            Ok(identity) => {
                self.items.lock().insert(identity, item);
                Ok(())
            },
            Err(e) => Err(StoreError::Write { table: table.to_string(), message: e.to_string() }),
        };

        self.exit_mutation();
        result
    }

    async fn delete(
        &self,
        table: &str,
        _schema: &KeySchema,
        identity: &Identity,
    ) -> Result<(), StoreError> {
        self.enter_mutation().await;

        let result = if self.failing_deletes.lock().contains(identity) {
            Err(StoreError::Delete {
                table: table.to_string(),
                message: format!("injected delete failure for {identity}"),
            })
        } else {
            self.items.lock().remove(identity);
            Ok(())
        };

        self.exit_mutation();
        result
    }
}
