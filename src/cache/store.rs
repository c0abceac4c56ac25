//! Hash Store Module
//!
//! The backend boundary: named hashes of string fields to string values.
//! Every cache backend implements these primitives and nothing more.

use async_trait::async_trait;

use crate::error::Result;

// == Hash Store ==
/// Low-level storage primitives over named hash collections.
///
/// Each call is atomic for a single (collection, key) pair; nothing spans
/// more than one call.
#[async_trait]
pub trait HashStore: Send + Sync + 'static {
    /// Reads one field.
    async fn hget(&self, collection: &str, key: &str) -> Result<Option<String>>;

    /// Writes one field. Returns the number of newly created fields (0 on overwrite).
    async fn hset(&self, collection: &str, key: &str, value: String) -> Result<u64>;

    async fn hexists(&self, collection: &str, key: &str) -> Result<bool>;

    /// Removes one field. Returns the number of fields removed.
    async fn hdel(&self, collection: &str, key: &str) -> Result<u64>;

    /// All values of a collection; empty when the collection does not exist.
    async fn hvals(&self, collection: &str) -> Result<Vec<String>>;

    /// Drops a whole collection. Returns true if it existed.
    async fn del(&self, collection: &str) -> Result<bool>;

    /// Names of all collections matching a glob pattern (`*` wildcard only).
    /// Used by the expiry sweep.
    async fn scan_match(&self, pattern: &str) -> Result<Vec<String>>;
}

/// Glob match supporting `*` as "any run of characters".
pub fn glob_match(pattern: &str, name: &str) -> bool {
    let mut parts = pattern.split('*');
    let Some(first) = parts.next() else {
        return name.is_empty();
    };
    let Some(mut rest) = name.strip_prefix(first) else {
        return false;
    };

    let mut segments: Vec<&str> = parts.collect();
    let Some(last) = segments.pop() else {
        // no wildcard at all
        return rest.is_empty();
    };

    for segment in segments {
        match rest.find(segment) {
            Some(idx) => rest = &rest[idx + segment.len()..],
            None => return false,
        }
    }
    rest.ends_with(last)
}
