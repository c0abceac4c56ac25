//! Entity Cache - collection-keyed entity cache for a remote-object client
//!
//! Caches remote entities in per-collection hashes (in memory or in Redis),
//! expires TTL'd keys with a background sweep, and exposes typed managers
//! that hydrate cached payloads and talk to the remote API.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod managers;
pub mod models;
pub mod rest;
pub mod tasks;

pub use cache::{CacheAdapter, MemoryCacheAdapter, RedisCacheAdapter};
pub use client::Client;
pub use config::Config;
pub use error::{CacheError, ClientError, RestError};
pub use managers::Manager;
pub use tasks::spawn_sweep_task;
