//! Roles held by one guild member.

use async_trait::async_trait;

use super::base::Manager;
use super::child::{ChildManager, Membership, Relationship};
use super::roles::{MembersManager, RolesManager};
use crate::client::Client;
use crate::error::ClientResult;
use crate::models::{Keyed, Role};
use crate::rest::{endpoints, NO_CONTENT};

/// Reads the member's role-id list from the members cache on every call.
/// The guild id (the base role every member holds) is always admitted.
#[derive(Debug)]
pub struct MemberRoleRelationship {
    members: MembersManager,
    member_id: String,
}

#[async_trait]
impl Relationship for MemberRoleRelationship {
    async fn membership(&self) -> ClientResult<Membership> {
        let role_ids = self
            .members
            .base()
            .get_raw(&self.member_id)
            .await?
            .map(|member| member.roles)
            .unwrap_or_default();
        Ok(Membership::new(
            role_ids,
            Some(self.members.guild_id().to_string()),
        ))
    }
}

/// Child view of a guild's roles, narrowed to one member.
///
/// Role definitions come from cache; which roles the member holds is
/// re-read each time. `add`/`remove` go straight to the remote.
#[derive(Debug)]
pub struct MemberRolesManager {
    client: Client,
    guild_id: String,
    member_id: String,
    view: ChildManager<RolesManager, MemberRoleRelationship>,
}

impl MemberRolesManager {
    pub fn new(client: Client, guild_id: &str, member_id: &str) -> Self {
        let relationship = MemberRoleRelationship {
            members: MembersManager::new(client.clone(), guild_id),
            member_id: member_id.to_string(),
        };
        Self {
            view: ChildManager::new(RolesManager::new(client.clone(), guild_id), relationship),
            client,
            guild_id: guild_id.to_string(),
            member_id: member_id.to_string(),
        }
    }

    pub async fn get(&self, role_id: &str) -> ClientResult<Option<Role>> {
        self.view.get(role_id).await
    }

    pub async fn array(&self) -> ClientResult<Vec<Role>> {
        self.view.array().await
    }

    /// Removes the member's roles from the guild roles cache.
    pub async fn flush(&self) -> ClientResult<bool> {
        self.view.flush().await
    }

    /// Grants `role` to the member. True iff the remote answers 204.
    pub async fn add<K: Keyed + ?Sized + Sync>(&self, role: &K) -> ClientResult<bool> {
        let path = endpoints::guild_member_role(&self.guild_id, &self.member_id, role.key());
        let response = self.client.rest().put(&path).await?;
        Ok(response.status == NO_CONTENT)
    }

    /// Revokes `role` from the member. True iff the remote answers 204.
    pub async fn remove<K: Keyed + ?Sized + Sync>(&self, role: &K) -> ClientResult<bool> {
        let path = endpoints::guild_member_role(&self.guild_id, &self.member_id, role.key());
        let response = self.client.rest().delete(&path).await?;
        Ok(response.status == NO_CONTENT)
    }
}
