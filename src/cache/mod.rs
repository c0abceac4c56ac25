//! Cache Module
//!
//! Collection-keyed cache store with TTL expiry swept in the background.
//! Backends implement [`HashStore`]; managers talk to [`CacheAdapter`].

mod adapter;
pub mod entry;
mod memory;
mod readiness;
mod redis_store;
mod stats;
mod store;


// Re-export public types
pub use adapter::{CacheAdapter, HashCacheAdapter, MemoryCacheAdapter, RedisCacheAdapter};
pub use entry::{ExpiryRecord, EXPIRES_SUFFIX};
pub use memory::MemoryStore;
pub use readiness::{Lifecycle, Readiness};
pub use redis_store::RedisStore;
pub use stats::SweepStats;
pub use store::{glob_match, HashStore};
