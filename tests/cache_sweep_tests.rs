//! Integration Tests for TTL expiry and the background sweep
//!
//! Drives the cache through its public adapter and checks what the sweeper
//! leaves behind in the underlying store.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use entity_cache::cache::entry::{current_timestamp_ms, ExpiryRecord};
use entity_cache::cache::{CacheAdapter, HashCacheAdapter, HashStore, MemoryCacheAdapter, MemoryStore};
use entity_cache::error::{CacheError, Result};
use entity_cache::tasks::sweep_expired;

const FAST_SWEEP: Duration = Duration::from_millis(20);

fn fast_cache() -> MemoryCacheAdapter {
    HashCacheAdapter::ready(MemoryStore::new(), FAST_SWEEP)
}

// == TTL Expiry ==

#[tokio::test]
async fn test_ttl_entry_disappears_after_sweep() {
    let cache = fast_cache();
    cache.set("dms", "u1", &json!("c1"), Some(30)).await.unwrap();
    cache.set("dms", "u2", &json!("c2"), None).await.unwrap();

    assert_eq!(cache.get("dms", "u1").await.unwrap(), Some(json!("c1")));

    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(cache.get("dms", "u1").await.unwrap(), None);
    assert_eq!(cache.get("dms", "u2").await.unwrap(), Some(json!("c2")));

    let store = cache.store().unwrap();
    assert!(!store.hexists("dms:expires", "u1").await.unwrap());

    let stats = cache.sweep_stats().await;
    assert!(stats.runs > 0);
    assert_eq!(stats.expired, 1);
}

#[tokio::test]
async fn test_entry_lives_until_its_ttl() {
    let cache = fast_cache();
    cache.set("dms", "u1", &json!("c1"), Some(60_000)).await.unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(cache.get("dms", "u1").await.unwrap(), Some(json!("c1")));
}

// == Crash Tolerance ==

#[tokio::test]
async fn test_sweep_tolerates_half_written_state() {
    let store = MemoryStore::new();
    let past = current_timestamp_ms() - 1_000;

    // record without its value
    let orphan = ExpiryRecord {
        name: "dms".into(),
        key: "gone".into(),
        at: past,
    };
    store
        .hset("dms:expires", "gone", orphan.encode().unwrap())
        .await
        .unwrap();
    // value without a record
    store.hset("dms", "kept", "\"c9\"".into()).await.unwrap();

    let report = sweep_expired(&store, current_timestamp_ms()).await;

    assert_eq!(report.failures, 0);
    assert_eq!(report.expired, 0);
    assert!(!store.hexists("dms:expires", "gone").await.unwrap());
    assert!(store.hexists("dms", "kept").await.unwrap());
}

/// Store whose deletes fail for one collection.
struct BrokenCollection {
    inner: MemoryStore,
    broken: &'static str,
}

#[async_trait]
impl HashStore for BrokenCollection {
    async fn hget(&self, collection: &str, key: &str) -> Result<Option<String>> {
        self.inner.hget(collection, key).await
    }

    async fn hset(&self, collection: &str, key: &str, value: String) -> Result<u64> {
        self.inner.hset(collection, key, value).await
    }

    async fn hexists(&self, collection: &str, key: &str) -> Result<bool> {
        self.inner.hexists(collection, key).await
    }

    async fn hdel(&self, collection: &str, key: &str) -> Result<u64> {
        if collection == self.broken {
            return Err(CacheError::Backend("connection reset".into()));
        }
        self.inner.hdel(collection, key).await
    }

    async fn hvals(&self, collection: &str) -> Result<Vec<String>> {
        self.inner.hvals(collection).await
    }

    async fn del(&self, collection: &str) -> Result<bool> {
        self.inner.del(collection).await
    }

    async fn scan_match(&self, pattern: &str) -> Result<Vec<String>> {
        self.inner.scan_match(pattern).await
    }
}

#[tokio::test]
async fn test_sweep_continues_past_failing_collection() {
    let store = BrokenCollection {
        inner: MemoryStore::new(),
        broken: "a",
    };
    for name in ["a", "b"] {
        store.hset(name, "k", "1".into()).await.unwrap();
        let record = ExpiryRecord {
            name: name.into(),
            key: "k".into(),
            at: 1,
        };
        store
            .hset(&format!("{name}:expires"), "k", record.encode().unwrap())
            .await
            .unwrap();
    }
    store
        .hset("c:expires", "bad", "not a record".into())
        .await
        .unwrap();

    let report = sweep_expired(&store, 10).await;

    assert_eq!(report.collections, 3);
    assert_eq!(report.expired, 1);
    assert_eq!(report.failures, 2);
    // the failed entry keeps its record for the next pass
    assert!(store.hexists("a", "k").await.unwrap());
    assert!(store.hexists("a:expires", "k").await.unwrap());
    assert!(!store.hexists("b", "k").await.unwrap());
}
