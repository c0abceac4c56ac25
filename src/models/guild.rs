//! Guild, role and member payloads and entities.

use serde::{Deserialize, Serialize};

use super::user::{User, UserPayload};

// == Guild ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildPayload {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Guild {
    pub id: String,
    pub name: String,
    pub owner_id: Option<String>,
    pub icon: Option<String>,
}

impl Guild {
    pub fn from_payload(payload: GuildPayload) -> Self {
        Self {
            id: payload.id,
            name: payload.name,
            owner_id: payload.owner_id,
            icon: payload.icon,
        }
    }
}

// == Role ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolePayload {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: u32,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub permissions: String,
    #[serde(default)]
    pub hoist: bool,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub mentionable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Role {
    pub id: String,
    pub guild_id: String,
    pub name: String,
    pub color: u32,
    pub position: i64,
    pub permissions: String,
    pub hoist: bool,
    pub managed: bool,
    pub mentionable: bool,
}

impl Role {
    pub fn from_payload(payload: RolePayload, guild_id: &str) -> Self {
        Self {
            id: payload.id,
            guild_id: guild_id.to_string(),
            name: payload.name,
            color: payload.color,
            position: payload.position,
            permissions: payload.permissions,
            hoist: payload.hoist,
            managed: payload.managed,
            mentionable: payload.mentionable,
        }
    }

    /// The base role every member holds shares its id with the guild.
    pub fn is_everyone(&self) -> bool {
        self.id == self.guild_id
    }

    pub fn mention(&self) -> String {
        format!("<@&{}>", self.id)
    }
}

// == Member ==
/// Guild member as sent by the remote API. `roles` is the live role-id list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberPayload {
    pub user: UserPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<String>,
    #[serde(default)]
    pub deaf: bool,
    #[serde(default)]
    pub mute: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub id: String,
    pub guild_id: String,
    pub user: User,
    pub nick: Option<String>,
    pub role_ids: Vec<String>,
    pub joined_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Member {
    pub fn from_payload(payload: MemberPayload, guild_id: &str) -> Self {
        let joined_at = payload
            .joined_at
            .as_deref()
            .and_then(|raw| chrono::DateTime::parse_from_rfc3339(raw).ok())
            .map(|at| at.with_timezone(&chrono::Utc));

        Self {
            id: payload.user.id.clone(),
            guild_id: guild_id.to_string(),
            user: User::from_payload(payload.user),
            nick: payload.nick,
            role_ids: payload.roles,
            joined_at,
        }
    }

    pub fn display_name(&self) -> &str {
        self.nick.as_deref().unwrap_or(&self.user.username)
    }
}
