//! Guild-scoped roles and members.

use async_trait::async_trait;

use super::base::{BaseManager, Manager};
use crate::client::Client;
use crate::error::ClientResult;
use crate::models::{Member, MemberPayload, Role, RolePayload};
use crate::rest::endpoints;

/// Roles of one guild, collection `roles:<guild_id>`.
#[derive(Debug)]
pub struct RolesManager {
    base: BaseManager<RolePayload>,
    guild_id: String,
}

impl RolesManager {
    pub fn new(client: Client, guild_id: &str) -> Self {
        Self {
            base: BaseManager::new(client, format!("roles:{guild_id}")),
            guild_id: guild_id.to_string(),
        }
    }

    pub fn guild_id(&self) -> &str {
        &self.guild_id
    }

    /// Replaces the cached roles with the guild's full remote role list.
    pub async fn fetch_all(&self) -> ClientResult<Vec<Role>> {
        let payloads: Vec<RolePayload> = self
            .base
            .client()
            .rest()
            .get(&endpoints::guild_roles(&self.guild_id))
            .await?
            .json()?;

        self.base.flush_raw().await?;
        let mut roles = Vec::with_capacity(payloads.len());
        for payload in payloads {
            self.base.set_raw(&payload.id, &payload).await?;
            roles.push(Role::from_payload(payload, &self.guild_id));
        }
        Ok(roles)
    }
}

#[async_trait]
impl Manager for RolesManager {
    type Payload = RolePayload;
    type Entity = Role;

    fn base(&self) -> &BaseManager<RolePayload> {
        &self.base
    }

    async fn hydrate(&self, payload: RolePayload) -> ClientResult<Role> {
        Ok(Role::from_payload(payload, &self.guild_id))
    }

    fn fetch_path(&self, key: &str) -> String {
        endpoints::guild_role(&self.guild_id, key)
    }
}

/// Members of one guild keyed by user id, collection `members:<guild_id>`.
#[derive(Debug)]
pub struct MembersManager {
    base: BaseManager<MemberPayload>,
    guild_id: String,
}

impl MembersManager {
    pub fn new(client: Client, guild_id: &str) -> Self {
        Self {
            base: BaseManager::new(client, format!("members:{guild_id}")),
            guild_id: guild_id.to_string(),
        }
    }

    pub fn guild_id(&self) -> &str {
        &self.guild_id
    }
}

#[async_trait]
impl Manager for MembersManager {
    type Payload = MemberPayload;
    type Entity = Member;

    fn base(&self) -> &BaseManager<MemberPayload> {
        &self.base
    }

    async fn hydrate(&self, payload: MemberPayload) -> ClientResult<Member> {
        Ok(Member::from_payload(payload, &self.guild_id))
    }

    fn fetch_path(&self, key: &str) -> String {
        endpoints::guild_member(&self.guild_id, key)
    }
}
