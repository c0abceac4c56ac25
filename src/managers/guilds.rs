//! Guilds and users: collections whose entities need no cross references.

use async_trait::async_trait;

use super::base::{BaseManager, Manager};
use crate::client::Client;
use crate::error::ClientResult;
use crate::models::{Guild, GuildPayload, User, UserPayload};
use crate::rest::endpoints;

/// Cached guilds, collection `guilds`.
#[derive(Debug)]
pub struct GuildsManager {
    base: BaseManager<GuildPayload>,
}

impl GuildsManager {
    pub fn new(client: Client) -> Self {
        Self {
            base: BaseManager::new(client, "guilds"),
        }
    }
}

#[async_trait]
impl Manager for GuildsManager {
    type Payload = GuildPayload;
    type Entity = Guild;

    fn base(&self) -> &BaseManager<GuildPayload> {
        &self.base
    }

    async fn hydrate(&self, payload: GuildPayload) -> ClientResult<Guild> {
        Ok(Guild::from_payload(payload))
    }

    fn fetch_path(&self, key: &str) -> String {
        endpoints::guild(key)
    }
}

/// Cached users, collection `users`.
#[derive(Debug)]
pub struct UsersManager {
    base: BaseManager<UserPayload>,
}

impl UsersManager {
    pub fn new(client: Client) -> Self {
        Self {
            base: BaseManager::new(client, "users"),
        }
    }
}

#[async_trait]
impl Manager for UsersManager {
    type Payload = UserPayload;
    type Entity = User;

    fn base(&self) -> &BaseManager<UserPayload> {
        &self.base
    }

    async fn hydrate(&self, payload: UserPayload) -> ClientResult<User> {
        Ok(User::from_payload(payload))
    }

    fn fetch_path(&self, key: &str) -> String {
        endpoints::user(key)
    }
}
