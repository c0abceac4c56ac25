//! Redis Store Module
//!
//! Hash store backed by a Redis server. Each collection is one Redis hash.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use tracing::info;

use crate::cache::store::HashStore;
use crate::error::Result;

/// Keys requested per SCAN round trip.
const SCAN_BATCH: usize = 100;

/// Values are read as bytes; foreign writers may store non-UTF-8 data,
/// which must not fail the read.
fn lossy_text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}

// == Redis Store ==
/// Redis-backed hash store over a multiplexed async connection.
#[derive(Clone)]
pub struct RedisStore {
    connection: MultiplexedConnection,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

impl RedisStore {
    /// Opens a connection to `redis_url` (`redis://host:port/db`).
    ///
    /// Connection parameters are passed through to the redis client unexamined.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = Client::open(redis_url)?;
        let connection = client.get_multiplexed_async_connection().await?;
        info!("Connected to Redis cache backend");
        Ok(Self { connection })
    }

    /// Ping Redis to check connectivity
    pub async fn ping(&self) -> Result<String> {
        let mut conn = self.connection.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong)
    }
}

#[async_trait]
impl HashStore for RedisStore {
    async fn hget(&self, collection: &str, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<Vec<u8>> = conn.hget(collection, key).await?;
        Ok(value.map(lossy_text))
    }

    async fn hset(&self, collection: &str, key: &str, value: String) -> Result<u64> {
        let mut conn = self.connection.clone();
        let added: u64 = conn.hset(collection, key, value).await?;
        Ok(added)
    }

    async fn hexists(&self, collection: &str, key: &str) -> Result<bool> {
        let mut conn = self.connection.clone();
        let exists: bool = conn.hexists(collection, key).await?;
        Ok(exists)
    }

    async fn hdel(&self, collection: &str, key: &str) -> Result<u64> {
        let mut conn = self.connection.clone();
        let removed: u64 = conn.hdel(collection, key).await?;
        Ok(removed)
    }

    async fn hvals(&self, collection: &str) -> Result<Vec<String>> {
        let mut conn = self.connection.clone();
        let values: Vec<Vec<u8>> = conn.hvals(collection).await?;
        Ok(values.into_iter().map(lossy_text).collect())
    }

    async fn del(&self, collection: &str) -> Result<bool> {
        let mut conn = self.connection.clone();
        let deleted: u64 = conn.del(collection).await?;
        Ok(deleted > 0)
    }

    async fn scan_match(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.connection.clone();
        let mut names = Vec::new();
        let mut cursor: u64 = 0;

        // Walk the full cursor; a single SCAN page can miss collections.
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;
            names.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        names.sort();
        names.dedup();
        Ok(names)
    }
}
