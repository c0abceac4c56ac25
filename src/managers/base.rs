//! Base Manager Module
//!
//! Raw collection access plus the [`Manager`] trait that layers hydration
//! and remote fetch on top of it.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::client::Client;
use crate::error::ClientResult;

// == Base Manager ==
/// Binds one cache collection to one payload type.
///
/// Holds no entities; the cache owns the serialized form.
pub struct BaseManager<P> {
    client: Client,
    collection: String,
    _payload: PhantomData<fn() -> P>,
}

impl<P> BaseManager<P>
where
    P: Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(client: Client, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
            _payload: PhantomData,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Raw payload for `key`, no hydration.
    pub async fn get_raw(&self, key: &str) -> ClientResult<Option<P>> {
        match self.client.cache().get(&self.collection, key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Stores a raw payload. Entity collections never expire.
    pub async fn set_raw(&self, key: &str, payload: &P) -> ClientResult<()> {
        let value = serde_json::to_value(payload)?;
        self.client
            .cache()
            .set(&self.collection, key, &value, None)
            .await?;
        Ok(())
    }

    pub async fn delete_raw(&self, key: &str) -> ClientResult<bool> {
        Ok(self.client.cache().delete(&self.collection, key).await?)
    }

    /// Every payload in the collection; empty when there is none.
    pub async fn array_raw(&self) -> ClientResult<Vec<P>> {
        let values = self
            .client
            .cache()
            .array(&self.collection)
            .await?
            .unwrap_or_default();
        values
            .into_iter()
            .map(|value| Ok(serde_json::from_value(value)?))
            .collect()
    }

    /// Drops the whole collection.
    pub async fn flush_raw(&self) -> ClientResult<bool> {
        Ok(self.client.cache().delete_cache(&self.collection).await?)
    }
}

impl<P> std::fmt::Debug for BaseManager<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseManager")
            .field("collection", &self.collection)
            .finish()
    }
}

// == Manager ==
/// Typed access to one collection: cached reads, explicit remote fetch.
///
/// Implementors supply hydration and the remote path; the rest is shared.
#[async_trait]
pub trait Manager: Send + Sync {
    type Payload: Serialize + DeserializeOwned + Send + Sync + 'static;
    type Entity: Send + 'static;

    fn base(&self) -> &BaseManager<Self::Payload>;

    /// Turns a payload into an entity, resolving cached references it needs.
    async fn hydrate(&self, payload: Self::Payload) -> ClientResult<Self::Entity>;

    /// Remote path of a single entity.
    fn fetch_path(&self, key: &str) -> String;

    /// Cached entity, or `None`. Never goes remote.
    async fn get(&self, key: &str) -> ClientResult<Option<Self::Entity>> {
        match self.base().get_raw(key).await? {
            Some(payload) => Ok(Some(self.hydrate(payload).await?)),
            None => Ok(None),
        }
    }

    /// Every cached entity, hydrated like `get`.
    async fn array(&self) -> ClientResult<Vec<Self::Entity>> {
        let payloads = self.base().array_raw().await?;
        let mut entities = Vec::with_capacity(payloads.len());
        for payload in payloads {
            entities.push(self.hydrate(payload).await?);
        }
        Ok(entities)
    }

    async fn set(&self, key: &str, payload: &Self::Payload) -> ClientResult<()> {
        self.base().set_raw(key, payload).await
    }

    async fn delete(&self, key: &str) -> ClientResult<bool> {
        self.base().delete_raw(key).await
    }

    /// Drops every cached entity of this manager.
    async fn flush(&self) -> ClientResult<bool> {
        self.base().flush_raw().await
    }

    /// Reads the entity remotely, caches the payload, and hydrates it.
    /// Remote errors propagate as-is; nothing is cached on failure.
    async fn fetch(&self, key: &str) -> ClientResult<Self::Entity> {
        let path = self.fetch_path(key);
        debug!("Fetching {} from {}", key, path);
        let payload: Self::Payload = self.base().client().rest().get(&path).await?.json()?;
        self.set(key, &payload).await?;
        self.hydrate(payload).await
    }
}
