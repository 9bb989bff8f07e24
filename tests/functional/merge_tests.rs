//! End-to-end merge scenarios against the in-memory store double.

use std::collections::HashMap;

use valkey_merge::client::StoreValue;
use valkey_merge::merge::{read_batch, MergeOrchestrator};

use crate::memory_store::MemoryStore;

const SCAN_COUNT: u32 = 100;
const FLUSH_THRESHOLD: usize = 1_000;

#[tokio::test]
async fn test_end_to_end_single_source() {
    // Source: a durable string, a persistent hash, and a soon-to-expire set.
    let source = MemoryStore::new();
    source.seed_string("a", "x", 90_000);
    source.seed_hash("b", &[("f", "v")], -1);
    source.seed_set("c", &["m1", "m2"], 10);

    let dest = MemoryStore::new();
    let mut orchestrator = MergeOrchestrator::new(&dest, SCAN_COUNT, FLUSH_THRESHOLD);
    orchestrator.merge_source("source1", &source).await.unwrap();
    let counters = orchestrator.into_counters();

    // "a" migrated with its long TTL applied on the destination.
    assert_eq!(dest.get("a"), Some(StoreValue::Text("x".to_string())));
    assert_eq!(dest.ttl("a"), 90_000);

    // "b" migrated as a hash with no expiry.
    let mut fields = HashMap::new();
    fields.insert("f".to_string(), "v".to_string());
    assert_eq!(dest.get("b"), Some(StoreValue::Fields(fields)));
    assert_eq!(dest.ttl("b"), -1);

    // "c" expires too soon to be worth migrating.
    assert!(!dest.contains("c"));

    assert_eq!(counters.scanned, 3);
    assert_eq!(counters.merged, 2);
    assert_eq!(counters.expired_skipped, 1);
    assert_eq!(counters.duplicate_skipped, 0);
}

#[tokio::test]
async fn test_multi_source_first_writer_wins() {
    let source1 = MemoryStore::new();
    source1.seed_string("shared", "v1", -1);

    let source2 = MemoryStore::new();
    source2.seed_string("shared", "v2", -1);

    let dest = MemoryStore::new();
    let mut orchestrator = MergeOrchestrator::new(&dest, SCAN_COUNT, FLUSH_THRESHOLD);
    orchestrator.merge_source("source1", &source1).await.unwrap();
    orchestrator.merge_source("source2", &source2).await.unwrap();
    let counters = orchestrator.into_counters();

    // The copy from the first configured source wins.
    assert_eq!(dest.get("shared"), Some(StoreValue::Text("v1".to_string())));
    assert_eq!(counters.duplicate_skipped, 1);
    assert_eq!(counters.merged, 1);
    assert_eq!(counters.scanned, 2);
}

#[tokio::test]
async fn test_expired_key_never_written_regardless_of_type() {
    let source = MemoryStore::new();
    source.seed_string("s", "v", 500);
    source.seed_hash("h", &[("f", "v")], 500);
    source.seed_list("l", &["e"], 500);
    source.seed_set("set", &["m"], 500);
    source.seed_scored("z", &[("m", 1.5)], 500);

    let dest = MemoryStore::new();
    let mut orchestrator = MergeOrchestrator::new(&dest, SCAN_COUNT, FLUSH_THRESHOLD);
    orchestrator.merge_source("source", &source).await.unwrap();
    let counters = orchestrator.into_counters();

    assert_eq!(dest.len(), 0);
    assert_eq!(counters.expired_skipped, 5);
    assert_eq!(counters.merged, 0);
}

#[tokio::test]
async fn test_all_types_round_trip() {
    let source = MemoryStore::new();
    source.seed_string("str", "value", -1);
    source.seed_hash("hash", &[("f1", "v1"), ("f2", "v2")], -1);
    source.seed_list("list", &["a", "b", "c"], -1);
    source.seed_set("set", &["m1", "m2"], -1);
    source.seed_scored("zset", &[("low", 1.0), ("high", 9.5)], 90_000);

    let dest = MemoryStore::new();
    let mut orchestrator = MergeOrchestrator::new(&dest, SCAN_COUNT, FLUSH_THRESHOLD);
    orchestrator.merge_source("source", &source).await.unwrap();
    let counters = orchestrator.into_counters();

    assert_eq!(dest.get("str"), Some(StoreValue::Text("value".to_string())));
    assert_eq!(
        dest.get("zset"),
        Some(StoreValue::Scored(vec![
            ("low".to_string(), 1.0),
            ("high".to_string(), 9.5),
        ]))
    );
    assert_eq!(dest.ttl("zset"), 90_000);
    assert_eq!(dest.len(), 5);
    assert_eq!(counters.merged, 5);
}

#[tokio::test]
async fn test_list_order_preserved() {
    let source = MemoryStore::new();
    source.seed_list("queue", &["first", "second", "third"], -1);

    let dest = MemoryStore::new();
    let mut orchestrator = MergeOrchestrator::new(&dest, SCAN_COUNT, FLUSH_THRESHOLD);
    orchestrator.merge_source("source", &source).await.unwrap();

    // Destination list reads back in source LRANGE order, not reversed.
    assert_eq!(
        dest.get("queue"),
        Some(StoreValue::Elements(vec![
            "first".to_string(),
            "second".to_string(),
            "third".to_string(),
        ]))
    );
}

#[tokio::test]
async fn test_flush_threshold_batches_pipeline_round_trips() {
    let source = MemoryStore::new();
    for i in 0..5 {
        source.seed_string(&format!("k{i}"), "v", -1);
    }

    let dest = MemoryStore::new();
    let mut orchestrator = MergeOrchestrator::new(&dest, SCAN_COUNT, 2);
    orchestrator.merge_source("source", &source).await.unwrap();

    // Five forwarded entries with a threshold of two: flushes after the
    // second and fourth, and the final drain carries the fifth.
    assert_eq!(dest.apply_calls(), 3);
    assert_eq!(dest.len(), 5);
}

#[tokio::test]
async fn test_scan_pages_cover_full_keyspace() {
    let source = MemoryStore::new();
    for i in 0..25 {
        source.seed_string(&format!("k{i:02}"), "v", -1);
    }

    let dest = MemoryStore::new();
    // Count hint far smaller than the keyspace forces many cursor steps.
    let mut orchestrator = MergeOrchestrator::new(&dest, 4, FLUSH_THRESHOLD);
    orchestrator.merge_source("source", &source).await.unwrap();
    let counters = orchestrator.into_counters();

    assert_eq!(counters.scanned, 25);
    assert_eq!(counters.merged, 25);
    assert_eq!(dest.len(), 25);
}

#[tokio::test]
async fn test_vanished_value_is_not_written_but_key_is_claimed() {
    let source1 = MemoryStore::new();
    source1.seed_string("ghost", "v1", -1);
    // TYPE and TTL resolve, then the key vanishes before the value fetch.
    source1.vanish_on_fetch("ghost");

    let source2 = MemoryStore::new();
    source2.seed_string("ghost", "v2", -1);

    let dest = MemoryStore::new();
    let mut orchestrator = MergeOrchestrator::new(&dest, SCAN_COUNT, FLUSH_THRESHOLD);
    orchestrator.merge_source("source1", &source1).await.unwrap();

    // Absent values write nothing and are not counted as merged.
    assert!(!dest.contains("ghost"));
    assert_eq!(orchestrator.counters().merged, 0);

    // The first observation still claimed the key.
    orchestrator.merge_source("source2", &source2).await.unwrap();
    let counters = orchestrator.into_counters();
    assert!(!dest.contains("ghost"));
    assert_eq!(counters.duplicate_skipped, 1);
}

#[tokio::test]
async fn test_scan_failure_aborts_run() {
    let source = MemoryStore::new();
    source.seed_string("k", "v", -1);
    source.fail_next_scan();

    let dest = MemoryStore::new();
    let mut orchestrator = MergeOrchestrator::new(&dest, SCAN_COUNT, FLUSH_THRESHOLD);
    let result = orchestrator.merge_source("source", &source).await;

    assert!(result.is_err());
    assert_eq!(dest.len(), 0);
}

#[tokio::test]
async fn test_read_batch_alignment() {
    let store = MemoryStore::new();
    store.seed_string("a", "x", -1);
    store.seed_hash("b", &[("f", "v")], 90_000);
    store.seed_list("c", &["e1", "e2"], 10);

    let keys = vec![
        "a".to_string(),
        "missing".to_string(),
        "b".to_string(),
        "c".to_string(),
    ];
    let entries = read_batch(&store, keys.clone()).await.unwrap();

    // One entry per key, in scan order, even for the vanished key.
    assert_eq!(entries.len(), keys.len());
    let entry_keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(entry_keys, vec!["a", "missing", "b", "c"]);
    assert!(entries[1].value.is_none());
}

#[tokio::test]
async fn test_empty_source_completes_cleanly() {
    let source = MemoryStore::new();
    let dest = MemoryStore::new();

    let mut orchestrator = MergeOrchestrator::new(&dest, SCAN_COUNT, FLUSH_THRESHOLD);
    orchestrator.merge_source("empty", &source).await.unwrap();
    let counters = orchestrator.into_counters();

    assert_eq!(counters.scanned, 0);
    assert_eq!(counters.merged, 0);
    assert_eq!(dest.len(), 0);
}
