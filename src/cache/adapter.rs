//! Cache Adapter Module
//!
//! The collection/key cache contract used by managers, and its implementation
//! over any [`HashStore`] backend with readiness gating and TTL sweeping.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::cache::entry::{decode_value, encode_value, expires_collection, ExpiryRecord};
use crate::cache::readiness::{Lifecycle, Readiness};
use crate::cache::{HashStore, MemoryStore, RedisStore, SweepStats};
use crate::error::Result;
use crate::tasks::{spawn_sweep_task, DEFAULT_SWEEP_INTERVAL};

// == Cache Adapter ==
/// Named-collection key-value cache with optional per-key TTL.
///
/// Missing keys and collections are `None`, never errors.
#[async_trait]
pub trait CacheAdapter: Send + Sync {
    /// Reads one value. Stored text that is not JSON comes back as a string.
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>>;

    /// Writes one value, expiring `ttl_ms` milliseconds from now when given.
    /// Returns the number of newly created keys.
    async fn set(&self, collection: &str, key: &str, value: &Value, ttl_ms: Option<u64>)
        -> Result<u64>;

    /// Removes one key. Returns true iff it existed.
    async fn delete(&self, collection: &str, key: &str) -> Result<bool>;

    /// All values of a collection, unordered; `None` when empty or missing.
    async fn array(&self, collection: &str) -> Result<Option<Vec<Value>>>;

    /// Drops a whole collection. Returns true iff anything was removed.
    async fn delete_cache(&self, collection: &str) -> Result<bool>;
}

// == Hash Cache Adapter ==
/// [`CacheAdapter`] over a [`HashStore`].
///
/// Every operation first waits for the backend to become ready. A value and
/// its expiry record are two separate writes; the sweep tolerates either
/// half existing alone.
pub struct HashCacheAdapter<S: HashStore> {
    readiness: Arc<Readiness<S>>,
    stats: Arc<RwLock<SweepStats>>,
    bootstrap: Option<JoinHandle<()>>,
    sweeper: Arc<Mutex<Option<JoinHandle<()>>>>,
}

/// In-process cache adapter.
pub type MemoryCacheAdapter = HashCacheAdapter<MemoryStore>;

/// Redis-backed cache adapter.
pub type RedisCacheAdapter = HashCacheAdapter<RedisStore>;

impl<S: HashStore> HashCacheAdapter<S> {
    /// Wraps an already-connected store and starts sweeping it.
    pub fn ready(store: S, sweep_interval: Duration) -> Self {
        let store = Arc::new(store);
        let stats = Arc::new(RwLock::new(SweepStats::new()));
        let sweeper = spawn_sweep_task(Arc::clone(&store), sweep_interval, Arc::clone(&stats));

        Self {
            readiness: Arc::new(Readiness::ready_shared(store)),
            stats,
            bootstrap: None,
            sweeper: Arc::new(Mutex::new(Some(sweeper))),
        }
    }

    /// Starts connecting in the background and returns immediately.
    ///
    /// Operations issued meanwhile wait for the outcome. If `setup` fails the
    /// adapter becomes `Failed` and every operation errors with `NotReady`.
    pub fn connect<F>(setup: F, sweep_interval: Duration) -> Self
    where
        F: Future<Output = Result<S>> + Send + 'static,
    {
        let readiness = Arc::new(Readiness::connecting());
        let stats = Arc::new(RwLock::new(SweepStats::new()));
        let sweeper = Arc::new(Mutex::new(None));

        let bootstrap = {
            let readiness = Arc::clone(&readiness);
            let stats = Arc::clone(&stats);
            let sweeper = Arc::clone(&sweeper);
            tokio::spawn(async move {
                match setup.await {
                    Ok(store) => {
                        let store = Arc::new(store);
                        let handle = spawn_sweep_task(Arc::clone(&store), sweep_interval, stats);
                        if let Ok(mut slot) = sweeper.lock() {
                            *slot = Some(handle);
                        }
                        readiness.mark_ready(store);
                        info!("Cache backend ready");
                    }
                    Err(err) => {
                        error!("Cache backend connection failed: {}", err);
                        readiness.mark_failed(err.to_string());
                    }
                }
            })
        };

        Self {
            readiness,
            stats,
            bootstrap: Some(bootstrap),
            sweeper,
        }
    }

    /// Current connection state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.readiness.lifecycle()
    }

    /// Waits for setup to finish; `Err(NotReady)` if it failed.
    pub async fn wait_ready(&self) -> Result<()> {
        self.readiness.wait().await.map(|_| ())
    }

    /// Backend handle without waiting; fails when not yet ready.
    pub fn store(&self) -> Result<Arc<S>> {
        self.readiness.handle()
    }

    /// Cumulative sweep statistics.
    pub async fn sweep_stats(&self) -> SweepStats {
        self.stats.read().await.clone()
    }

    /// Stops the background sweeper. Cached data is left untouched.
    ///
    /// A setup still in flight is abandoned and the adapter becomes `Failed`,
    /// so later operations error instead of waiting forever.
    pub fn shutdown(&self) {
        if let Some(bootstrap) = &self.bootstrap {
            bootstrap.abort();
            if self.readiness.lifecycle() == Lifecycle::Connecting {
                self.readiness.mark_failed("cache shut down");
            }
        }
        let handle = self.sweeper.lock().ok().and_then(|mut slot| slot.take());
        if let Some(handle) = handle {
            handle.abort();
            info!("Expiry sweeper stopped");
        }
    }
}

impl<S: HashStore> Drop for HashCacheAdapter<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<S: HashStore> std::fmt::Debug for HashCacheAdapter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashCacheAdapter")
            .field("lifecycle", &self.lifecycle())
            .finish()
    }
}

#[async_trait]
impl<S: HashStore> CacheAdapter for HashCacheAdapter<S> {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>> {
        let store = self.readiness.wait().await?;
        Ok(store.hget(collection, key).await?.map(decode_value))
    }

    async fn set(
        &self,
        collection: &str,
        key: &str,
        value: &Value,
        ttl_ms: Option<u64>,
    ) -> Result<u64> {
        let store = self.readiness.wait().await?;
        let added = store.hset(collection, key, encode_value(value)?).await?;

        let expires = expires_collection(collection);
        match ttl_ms {
            Some(ttl) => {
                let record = ExpiryRecord::new(collection, key, ttl);
                store.hset(&expires, key, record.encode()?).await?;
            }
            None => {
                // a TTL-less overwrite must not be swept by an older record
                store.hdel(&expires, key).await?;
            }
        }

        Ok(added)
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<bool> {
        let store = self.readiness.wait().await?;
        if !store.hexists(collection, key).await? {
            return Ok(false);
        }
        store.hdel(collection, key).await?;
        store.hdel(&expires_collection(collection), key).await?;
        Ok(true)
    }

    async fn array(&self, collection: &str) -> Result<Option<Vec<Value>>> {
        let store = self.readiness.wait().await?;
        let values = store.hvals(collection).await?;
        if values.is_empty() {
            return Ok(None);
        }
        Ok(Some(values.into_iter().map(decode_value).collect()))
    }

    async fn delete_cache(&self, collection: &str) -> Result<bool> {
        let store = self.readiness.wait().await?;
        let removed = store.del(collection).await?;
        store.del(&expires_collection(collection)).await?;
        Ok(removed)
    }
}

impl MemoryCacheAdapter {
    /// Fresh in-process cache sweeping at the default interval.
    pub fn in_memory() -> Self {
        Self::ready(MemoryStore::new(), DEFAULT_SWEEP_INTERVAL)
    }
}

impl RedisCacheAdapter {
    /// Connects to `redis_url` in the background.
    pub fn redis(redis_url: impl Into<String>, sweep_interval: Duration) -> Self {
        let redis_url = redis_url.into();
        Self::connect(
            async move { RedisStore::connect(&redis_url).await },
            sweep_interval,
        )
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use serde_json::json;

    fn adapter() -> MemoryCacheAdapter {
        MemoryCacheAdapter::ready(MemoryStore::new(), Duration::from_millis(20))
    }

    #[tokio::test]
    async fn test_set_and_get_structured() {
        let cache = adapter();
        let value = json!({"id": "1", "name": "general", "tags": [1, 2]});

        assert_eq!(cache.set("channels", "1", &value, None).await.unwrap(), 1);
        assert_eq!(cache.get("channels", "1").await.unwrap(), Some(value));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let cache = adapter();
        assert_eq!(cache.get("channels", "nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overwrite_reports_zero_new_keys() {
        let cache = adapter();
        cache.set("c", "k", &json!(1), None).await.unwrap();
        assert_eq!(cache.set("c", "k", &json!(2), None).await.unwrap(), 0);
        assert_eq!(cache.get("c", "k").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_delete_semantics() {
        let cache = adapter();
        assert!(!cache.delete("c", "never").await.unwrap());

        cache.set("c", "k", &json!("v"), None).await.unwrap();
        assert!(cache.delete("c", "k").await.unwrap());
        assert_eq!(cache.get("c", "k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_array_empty_is_none() {
        let cache = adapter();
        assert_eq!(cache.array("empty").await.unwrap(), None);

        cache.set("c", "a", &json!(1), None).await.unwrap();
        cache.set("c", "b", &json!(2), None).await.unwrap();
        let mut values = cache.array("c").await.unwrap().unwrap();
        values.sort_by_key(|v| v.as_i64());
        assert_eq!(values, vec![json!(1), json!(2)]);
    }

    #[tokio::test]
    async fn test_delete_cache() {
        let cache = adapter();
        assert!(!cache.delete_cache("c").await.unwrap());

        cache.set("c", "a", &json!(1), Some(60_000)).await.unwrap();
        assert!(cache.delete_cache("c").await.unwrap());
        assert_eq!(cache.array("c").await.unwrap(), None);
        assert_eq!(cache.array("c:expires").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ttl_writes_expiry_record() {
        let cache = adapter();
        cache.set("user_dms", "42", &json!("7"), Some(60_000)).await.unwrap();

        let record = cache.get("user_dms:expires", "42").await.unwrap().unwrap();
        assert_eq!(record["name"], "user_dms");
        assert_eq!(record["key"], "42");
    }

    #[tokio::test]
    async fn test_ttl_less_overwrite_clears_record() {
        let cache = adapter();
        cache.set("c", "k", &json!(1), Some(50)).await.unwrap();
        cache.set("c", "k", &json!(2), None).await.unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(cache.get("c", "k").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_ttl_expiry_via_sweep() {
        let cache = adapter();
        cache.set("c", "k", &json!({"v": 1}), Some(100)).await.unwrap();
        assert!(cache.get("c", "k").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(cache.get("c", "k").await.unwrap(), None);
        assert!(cache.sweep_stats().await.expired >= 1);
    }

    #[tokio::test]
    async fn test_connect_failure_fails_fast() {
        let cache = MemoryCacheAdapter::connect(
            async { Err(CacheError::Backend("connection refused".into())) },
            Duration::from_millis(20),
        );

        let result = cache.get("c", "k").await;
        assert!(matches!(result, Err(CacheError::NotReady(_))));
        assert!(matches!(cache.lifecycle(), Lifecycle::Failed(_)));
        assert!(cache.store().is_err());
    }

    #[tokio::test]
    async fn test_operations_queue_behind_connect() {
        let cache = MemoryCacheAdapter::connect(
            async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(MemoryStore::new())
            },
            Duration::from_millis(20),
        );
        assert_eq!(cache.lifecycle(), Lifecycle::Connecting);

        cache.set("c", "k", &json!(1), None).await.unwrap();
        assert_eq!(cache.lifecycle(), Lifecycle::Ready);
        assert_eq!(cache.get("c", "k").await.unwrap(), Some(json!(1)));
    }

    #[tokio::test]
    async fn test_shutdown_while_connecting_fails_pending_ops() {
        let cache = MemoryCacheAdapter::connect(
            async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(MemoryStore::new())
            },
            Duration::from_millis(20),
        );
        cache.shutdown();

        assert_eq!(
            cache.lifecycle(),
            Lifecycle::Failed("cache shut down".to_string())
        );
        let result = tokio::time::timeout(Duration::from_secs(2), cache.get("c", "k"))
            .await
            .expect("get must not hang after shutdown");
        assert!(matches!(result, Err(CacheError::NotReady(_))));
    }

    #[tokio::test]
    async fn test_shutdown_after_ready_keeps_data_reachable() {
        let cache =
            MemoryCacheAdapter::connect(async { Ok(MemoryStore::new()) }, Duration::from_millis(20));
        cache.wait_ready().await.unwrap();
        cache.shutdown();

        assert_eq!(cache.lifecycle(), Lifecycle::Ready);
        cache.set("c", "k", &json!(1), None).await.unwrap();
        assert_eq!(cache.get("c", "k").await.unwrap(), Some(json!(1)));
    }

    #[tokio::test]
    async fn test_delete_drops_expiry_record() {
        let cache = adapter();
        cache.set("c", "k", &json!(1), Some(60_000)).await.unwrap();

        assert!(cache.delete("c", "k").await.unwrap());
        assert_eq!(cache.get("c:expires", "k").await.unwrap(), None);
        let store = cache.store().unwrap();
        assert!(!store.hexists("c:expires", "k").await.unwrap());
    }

    #[tokio::test]
    async fn test_shutdown_stops_sweeper() {
        let cache = adapter();
        cache.shutdown();
        cache.set("c", "k", &json!(1), Some(10)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        // nothing sweeps any more, the entry lingers
        assert_eq!(cache.get("c", "k").await.unwrap(), Some(json!(1)));
    }
}
