//! Client Module
//!
//! Shared state every manager works through: the cache, the remote transport
//! and the acting identity. Managers are cheap views built on demand.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::cache::{CacheAdapter, MemoryCacheAdapter, MemoryStore, RedisCacheAdapter};
use crate::config::{CacheBackend, Config};
use crate::error::ClientResult;
use crate::managers::{
    ChannelsManager, GuildsManager, MemberRolesManager, MembersManager, RolesManager, UsersManager,
};
use crate::models::User;
use crate::rest::{HttpTransport, RestTransport};

struct ClientInner {
    cache: Arc<dyn CacheAdapter>,
    rest: Arc<dyn RestTransport>,
    user: RwLock<Option<User>>,
}

/// Handle to the shared cache and transport. Cloning is cheap.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    pub fn new(cache: Arc<dyn CacheAdapter>, rest: Arc<dyn RestTransport>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                cache,
                rest,
                user: RwLock::new(None),
            }),
        }
    }

    /// Builds the configured cache backend and HTTP transport.
    ///
    /// Must run inside a tokio runtime; the backend starts its sweeper immediately.
    pub fn from_config(config: &Config) -> ClientResult<Self> {
        let cache: Arc<dyn CacheAdapter> = match config.cache_backend {
            CacheBackend::Memory => Arc::new(MemoryCacheAdapter::ready(
                MemoryStore::new(),
                config.sweep_interval(),
            )),
            CacheBackend::Redis => Arc::new(RedisCacheAdapter::redis(
                config.redis_url.clone(),
                config.sweep_interval(),
            )),
        };
        let rest = HttpTransport::new(
            config.api_base_url.clone(),
            Some(config.bot_token.clone()),
            config.rest_timeout(),
        )?;

        info!("Client created with {:?} cache backend", config.cache_backend);
        Ok(Self::new(cache, Arc::new(rest)))
    }

    pub fn cache(&self) -> &dyn CacheAdapter {
        self.inner.cache.as_ref()
    }

    pub fn rest(&self) -> &dyn RestTransport {
        self.inner.rest.as_ref()
    }

    /// The identity this client acts as, once known.
    pub async fn user(&self) -> Option<User> {
        self.inner.user.read().await.clone()
    }

    pub async fn set_user(&self, user: User) {
        *self.inner.user.write().await = Some(user);
    }

    // == Managers ==
    pub fn channels(&self) -> ChannelsManager {
        ChannelsManager::new(self.clone())
    }

    pub fn guilds(&self) -> GuildsManager {
        GuildsManager::new(self.clone())
    }

    pub fn users(&self) -> UsersManager {
        UsersManager::new(self.clone())
    }

    pub fn roles(&self, guild_id: &str) -> RolesManager {
        RolesManager::new(self.clone(), guild_id)
    }

    pub fn members(&self, guild_id: &str) -> MembersManager {
        MembersManager::new(self.clone(), guild_id)
    }

    /// Roles held by one member, filtered live from the guild's roles.
    pub fn member_roles(&self, guild_id: &str, member_id: &str) -> MemberRolesManager {
        MemberRolesManager::new(self.clone(), guild_id, member_id)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::managers::Manager;
    use crate::models::UserPayload;

    #[tokio::test]
    async fn test_from_config_memory_backend() {
        let config = Config::default();
        let client = Client::from_config(&config).unwrap();

        assert!(client.user().await.is_none());
        client
            .set_user(User::from_payload(UserPayload {
                id: "1".into(),
                username: "robot".into(),
                discriminator: None,
                avatar: None,
                bot: true,
            }))
            .await;
        assert_eq!(client.user().await.map(|u| u.id), Some("1".to_string()));
    }

    #[tokio::test]
    async fn test_managers_share_one_cache() {
        let client = Client::from_config(&Config::default()).unwrap();
        let other = client.clone();

        client
            .cache()
            .set("guilds", "g1", &serde_json::json!({"id": "g1", "name": "home"}), None)
            .await
            .unwrap();

        assert_eq!(other.guilds().base().collection(), "guilds");
        assert!(other.guilds().get("g1").await.unwrap().is_some());
    }
}
