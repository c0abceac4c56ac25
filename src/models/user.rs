//! User payload and entity.

use serde::{Deserialize, Serialize};

/// User as sent by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPayload {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub discriminator: Option<String>,
    pub avatar: Option<String>,
    pub bot: bool,
}

impl User {
    pub fn from_payload(payload: UserPayload) -> Self {
        Self {
            id: payload.id,
            username: payload.username,
            discriminator: payload.discriminator,
            avatar: payload.avatar,
            bot: payload.bot,
        }
    }

    /// `username#discriminator`, or the bare username when there is none.
    pub fn tag(&self) -> String {
        match &self.discriminator {
            Some(d) if d != "0" => format!("{}#{}", self.username, d),
            _ => self.username.clone(),
        }
    }

    /// Mention markup for this user.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}
