//! Child Manager Module
//!
//! Relationship-scoped view over a parent manager. Owns no storage: reads
//! filter the parent, `flush` deletes from the parent.

use std::collections::HashSet;

use async_trait::async_trait;

use super::base::Manager;
use crate::error::ClientResult;
use crate::models::Keyed;

// == Membership ==
/// Snapshot of which keys a relationship admits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Membership {
    keys: HashSet<String>,
    /// Key admitted regardless of the set (e.g. a guild's base role)
    sentinel: Option<String>,
}

impl Membership {
    pub fn new(keys: impl IntoIterator<Item = String>, sentinel: Option<String>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            sentinel,
        }
    }

    pub fn admits(&self, key: &str) -> bool {
        self.sentinel.as_deref() == Some(key) || self.keys.contains(key)
    }
}

/// Source of truth for a child view's filter.
///
/// Called on every read; implementations must not cache the result.
#[async_trait]
pub trait Relationship: Send + Sync {
    async fn membership(&self) -> ClientResult<Membership>;
}

// == Child Manager ==
pub struct ChildManager<M, R> {
    parent: M,
    relationship: R,
}

impl<M, R> ChildManager<M, R>
where
    M: Manager,
    M::Entity: Keyed,
    R: Relationship,
{
    pub fn new(parent: M, relationship: R) -> Self {
        Self {
            parent,
            relationship,
        }
    }

    pub fn parent(&self) -> &M {
        &self.parent
    }

    pub fn relationship(&self) -> &R {
        &self.relationship
    }

    /// The parent's entity, only if the relationship currently admits it.
    pub async fn get(&self, key: &str) -> ClientResult<Option<M::Entity>> {
        let entity = self.parent.get(key).await?;
        let membership = self.relationship.membership().await?;
        Ok(entity.filter(|entity| membership.admits(entity.key())))
    }

    /// The parent's entities admitted by the relationship right now.
    pub async fn array(&self) -> ClientResult<Vec<M::Entity>> {
        let entities = self.parent.array().await?;
        let membership = self.relationship.membership().await?;
        Ok(entities
            .into_iter()
            .filter(|entity| membership.admits(entity.key()))
            .collect())
    }

    /// Deletes every entity in the current view from the parent's storage.
    pub async fn flush(&self) -> ClientResult<bool> {
        for entity in self.array().await? {
            self.parent.delete(entity.key()).await?;
        }
        Ok(true)
    }
}

impl<M: std::fmt::Debug, R> std::fmt::Debug for ChildManager<M, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChildManager")
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_admits_set_and_sentinel() {
        let membership = Membership::new(vec!["r2".to_string()], Some("g".to_string()));
        assert!(membership.admits("r2"));
        assert!(membership.admits("g"));
        assert!(!membership.admits("r3"));
    }

    #[test]
    fn test_empty_membership() {
        let membership = Membership::default();
        assert!(!membership.admits(""));
        assert!(!membership.admits("anything"));
    }
}
