#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::expect_used, reason = "integration test — panics are the assertion mechanism")]

use std::sync::Arc;
use std::time::Duration;

use aws_sdk_dynamodb::types::AttributeValue;
use dysync_core::store::string_item;
use dysync_core::{MemoryTable, SyncEngine};
use dysync_types::{
    AccountCredentials, Identity, ItemFilter, KeySchema, RunTally, StoreError, SyncConfig,
    SyncError, SyncMode, SyncPlan,
};

fn credentials(key: &str) -> AccountCredentials {
    AccountCredentials {
        region: Some("us-east-1".to_string()),
        access_key_id: Some(key.to_string()),
        secret_access_key: Some(format!("{key}-secret")),
        ..Default::default()
    }
}

fn config() -> SyncConfig {
    SyncConfig {
        table: "orders".to_string(),
        source: credentials("AKIASRC"),
        destination: credentials("AKIADST"),
        filter: ItemFilter::default(),
        copy_only: false,
        concurrency: 4,
        dry_run: false,
    }
}

fn plan(config: SyncConfig) -> SyncPlan {
    config.plan().expect("valid test config")
}

fn composite() -> KeySchema {
    KeySchema::composite("id", "sk")
}

/// Source `{1,A} {2,B}`, destination `{2,B} {3,C}`.
fn scenario() -> (Arc<MemoryTable>, Arc<MemoryTable>) {
    let source = MemoryTable::new(composite()).with_items([
        string_item(&[("id", "1"), ("sk", "A"), ("qty", "5")]),
        string_item(&[("id", "2"), ("sk", "B"), ("qty", "7")]),
    ]);
    let destination = MemoryTable::new(composite()).with_items([
        string_item(&[("id", "2"), ("sk", "B"), ("qty", "7")]),
        string_item(&[("id", "3"), ("sk", "C"), ("qty", "9")]),
    ]);
    (Arc::new(source), Arc::new(destination))
}

fn engine(
    source: &Arc<MemoryTable>,
    destination: &Arc<MemoryTable>,
    plan: SyncPlan,
) -> SyncEngine {
    SyncEngine::new(source.clone(), destination.clone(), plan)
}

#[tokio::test]
async fn test_full_sync_converges_destination() {
    let (source, destination) = scenario();

    let report = engine(&source, &destination, plan(config())).run().await.expect("sync succeeds");

    assert_eq!(
        destination.identities(),
        vec![Identity::composite("1", "A"), Identity::composite("2", "B")]
    );
    assert_eq!(
        report.tally,
        RunTally { copied: 2, copy_failed: 0, deleted: 1, delete_failed: 0, skipped: 0 }
    );
    assert_eq!(report.mode, SyncMode::FullSync);
    assert!(!report.dry_run);
    assert_eq!(destination.snapshot(), source.snapshot());
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let (source, destination) = scenario();

    engine(&source, &destination, plan(config())).run().await.expect("first run");
    let after_first = destination.snapshot();
    let second = engine(&source, &destination, plan(config())).run().await.expect("second run");

    assert_eq!(destination.snapshot(), after_first);
    assert_eq!(second.tally.deleted, 0);
    assert_eq!(second.tally.delete_failed, 0);
    assert_eq!(second.tally.copied, 2);
}

#[tokio::test]
async fn test_dry_run_leaves_destination_untouched() {
    let (source, destination) = scenario();
    let before = destination.snapshot();

    let report = engine(&source, &destination, plan(SyncConfig { dry_run: true, ..config() }))
        .run()
        .await
        .expect("dry run succeeds");

    assert_eq!(destination.snapshot(), before);
    assert_eq!(destination.mutation_count(), 0);
    assert!(report.dry_run);
    assert_eq!(
        report.tally,
        RunTally { copied: 2, copy_failed: 0, deleted: 1, delete_failed: 0, skipped: 0 }
    );
}

#[tokio::test]
async fn test_filter_never_deletes() {
    for filter in [
        ItemFilter::new(Some("1".to_string()), None),
        ItemFilter::new(None, Some("A".to_string())),
        ItemFilter::new(Some("1".to_string()), Some("A".to_string())),
    ] {
        let (source, destination) = scenario();

        let report = engine(&source, &destination, plan(SyncConfig { filter, ..config() }))
            .run()
            .await
            .expect("filtered sync succeeds");

        assert_eq!(report.mode, SyncMode::CopyOnly);
        assert_eq!(report.tally.copied, 1);
        assert_eq!(report.tally.deleted, 0);
        assert_eq!(
            destination.identities(),
            vec![
                Identity::composite("1", "A"),
                Identity::composite("2", "B"),
                Identity::composite("3", "C"),
            ]
        );
    }
}

#[tokio::test]
async fn test_explicit_copy_only_keeps_extra_items() {
    let (source, destination) = scenario();

    let report = engine(&source, &destination, plan(SyncConfig { copy_only: true, ..config() }))
        .run()
        .await
        .expect("copy-only succeeds");

    assert_eq!(report.tally.copied, 2);
    assert_eq!(report.tally.deleted, 0);
    assert!(destination.identities().contains(&Identity::composite("3", "C")));
}

#[tokio::test]
async fn test_copy_overwrites_stale_attributes() {
    let (source, destination) = scenario();
    destination.insert(string_item(&[("id", "1"), ("sk", "A"), ("qty", "0"), ("stale", "y")]));

    engine(&source, &destination, plan(config())).run().await.expect("sync succeeds");

    let synced = destination.snapshot();
    let item = synced.get(&Identity::composite("1", "A")).expect("item copied");
    assert_eq!(item.get("qty"), Some(&AttributeValue::S("5".to_string())));
    assert!(!item.contains_key("stale"));
}

#[tokio::test]
async fn test_failed_copy_is_counted_and_item_is_not_deleted() {
    let (source, destination) = scenario();
    destination.insert(string_item(&[("id", "1"), ("sk", "A"), ("qty", "old")]));
    destination.fail_put_for(Identity::composite("1", "A"));

    let report = engine(&source, &destination, plan(config())).run().await.expect("sync completes");

    assert_eq!(report.tally.copied, 1);
    assert_eq!(report.tally.copy_failed, 1);
    assert_eq!(report.tally.deleted, 1);
    assert!(report.tally.has_failures());
    assert_eq!(
        destination.identities(),
        vec![Identity::composite("1", "A"), Identity::composite("2", "B")]
    );
}

#[tokio::test]
async fn test_failed_delete_is_counted() {
    let (source, destination) = scenario();
    destination.fail_delete_for(Identity::composite("3", "C"));

    let report = engine(&source, &destination, plan(config())).run().await.expect("sync completes");

    assert_eq!(report.tally.deleted, 0);
    assert_eq!(report.tally.delete_failed, 1);
    assert!(destination.identities().contains(&Identity::composite("3", "C")));
}

#[tokio::test]
async fn test_malformed_items_are_skipped_not_fatal() {
    let (source, destination) = scenario();
    let mut numeric = string_item(&[("sk", "N")]);
    numeric.insert("id".to_string(), AttributeValue::N("42".to_string()));
    source.insert(numeric.clone());
    destination.insert(numeric);

    let report = engine(&source, &destination, plan(config())).run().await.expect("sync completes");

    assert_eq!(report.tally.copied, 2);
    assert_eq!(report.tally.deleted, 1);
    assert_eq!(report.tally.skipped, 2);
    // the unkeyed destination item is never addressed by a delete
    assert_eq!(destination.len(), 3);
}

#[tokio::test]
async fn test_hash_only_table() {
    let schema = KeySchema::hash_only("pk");
    let source = Arc::new(MemoryTable::new(schema.clone()).with_items([
        string_item(&[("pk", "user#1")]),
        string_item(&[("pk", "user#2")]),
    ]));
    let destination = Arc::new(MemoryTable::new(schema).with_items([
        string_item(&[("pk", "user#2")]),
        string_item(&[("pk", "user#9")]),
    ]));

    let report = engine(&source, &destination, plan(config())).run().await.expect("sync succeeds");

    assert_eq!(
        destination.identities(),
        vec![Identity::single("user#1"), Identity::single("user#2")]
    );
    assert_eq!(report.tally.deleted, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_bound_is_respected() {
    let items: Vec<_> = (0..40)
        .map(|n| {
            let id = format!("{n:03}");
            string_item(&[("id", id.as_str()), ("sk", "S")])
        })
        .collect();
    let stale: Vec<_> = (100..130)
        .map(|n| {
            let id = format!("{n:03}");
            string_item(&[("id", id.as_str()), ("sk", "S")])
        })
        .collect();
    let source = Arc::new(MemoryTable::new(composite()).with_items(items));
    let destination = Arc::new(
        MemoryTable::new(composite())
            .with_items(stale)
            .with_latency(Duration::from_millis(2)),
    );

    let report = engine(&source, &destination, plan(SyncConfig { concurrency: 3, ..config() }))
        .run()
        .await
        .expect("sync succeeds");

    assert_eq!(report.tally.copied, 40);
    assert_eq!(report.tally.deleted, 30);
    assert!(destination.peak_in_flight() <= 3, "peak was {}", destination.peak_in_flight());
    assert_eq!(destination.mutation_count(), 70);
    assert_eq!(destination.snapshot(), source.snapshot());
}

#[tokio::test]
async fn test_schema_failure_aborts_before_any_write() {
    let (source, destination) = scenario();
    source.fail_describe();

    let err = engine(&source, &destination, plan(config())).run().await.unwrap_err();

    assert!(matches!(err, SyncError::Schema(_)));
    assert!(err.is_fatal());
    assert_eq!(destination.mutation_count(), 0);
}

#[tokio::test]
async fn test_source_scan_failure_aborts_before_any_write() {
    let (source, destination) = scenario();
    source.fail_scans();

    let err = engine(&source, &destination, plan(config())).run().await.unwrap_err();

    assert!(matches!(err, SyncError::Store(StoreError::Fetch { .. })));
    assert_eq!(destination.mutation_count(), 0);
}

#[tokio::test]
async fn test_destination_scan_failure_keeps_copies_but_fails_run() {
    let (source, destination) = scenario();
    destination.fail_scans();

    let err = engine(&source, &destination, plan(config())).run().await.unwrap_err();

    assert!(matches!(err, SyncError::Store(StoreError::Fetch { .. })));
    assert_eq!(destination.mutation_count(), 2);
    assert!(destination.identities().contains(&Identity::composite("3", "C")));
}
