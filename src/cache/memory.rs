//! In-Memory Store Module
//!
//! Process-local hash store. Same semantics as the Redis backend, minus the network.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::store::{glob_match, HashStore};
use crate::error::Result;

// == Memory Store ==
/// Nested `collection -> key -> value` map behind an async lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live collections (an emptied hash disappears, as in Redis).
    pub async fn collection_count(&self) -> usize {
        self.collections.read().await.len()
    }
}

#[async_trait]
impl HashStore for MemoryStore {
    async fn hget(&self, collection: &str, key: &str) -> Result<Option<String>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|fields| fields.get(key))
            .cloned())
    }

    async fn hset(&self, collection: &str, key: &str, value: String) -> Result<u64> {
        let mut collections = self.collections.write().await;
        let previous = collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(if previous.is_none() { 1 } else { 0 })
    }

    async fn hexists(&self, collection: &str, key: &str) -> Result<bool> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .is_some_and(|fields| fields.contains_key(key)))
    }

    async fn hdel(&self, collection: &str, key: &str) -> Result<u64> {
        let mut collections = self.collections.write().await;
        let Some(fields) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let removed = fields.remove(key).is_some();
        if fields.is_empty() {
            collections.remove(collection);
        }
        Ok(u64::from(removed))
    }

    async fn hvals(&self, collection: &str) -> Result<Vec<String>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|fields| fields.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn del(&self, collection: &str) -> Result<bool> {
        let mut collections = self.collections.write().await;
        Ok(collections.remove(collection).is_some())
    }

    async fn scan_match(&self, pattern: &str) -> Result<Vec<String>> {
        let collections = self.collections.read().await;
        Ok(collections
            .keys()
            .filter(|name| glob_match(pattern, name))
            .cloned()
            .collect())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hset_reports_new_fields() {
        let store = MemoryStore::new();

        assert_eq!(store.hset("c", "k", "1".into()).await.unwrap(), 1);
        assert_eq!(store.hset("c", "k", "2".into()).await.unwrap(), 0);
        assert_eq!(store.hget("c", "k").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_hdel_drops_empty_collection() {
        let store = MemoryStore::new();
        store.hset("c", "k", "v".into()).await.unwrap();

        assert_eq!(store.hdel("c", "k").await.unwrap(), 1);
        assert_eq!(store.hdel("c", "k").await.unwrap(), 0);
        assert_eq!(store.collection_count().await, 0);
    }

    #[tokio::test]
    async fn test_hvals_missing_collection() {
        let store = MemoryStore::new();
        assert!(store.hvals("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_del_collection() {
        let store = MemoryStore::new();
        store.hset("c", "a", "1".into()).await.unwrap();
        store.hset("c", "b", "2".into()).await.unwrap();

        assert!(store.del("c").await.unwrap());
        assert!(!store.del("c").await.unwrap());
        assert!(!store.hexists("c", "a").await.unwrap());
    }

    #[tokio::test]
    async fn test_scan_match() {
        let store = MemoryStore::new();
        store.hset("user_dms", "1", "x".into()).await.unwrap();
        store.hset("user_dms:expires", "1", "x".into()).await.unwrap();
        store.hset("roles:9:expires", "1", "x".into()).await.unwrap();

        let mut names = store.scan_match("*:expires").await.unwrap();
        names.sort();
        assert_eq!(names, vec!["roles:9:expires", "user_dms:expires"]);
    }
}
