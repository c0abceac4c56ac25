//! Remote resource paths, relative to the API base URL.

pub fn channel(channel_id: &str) -> String {
    format!("/channels/{channel_id}")
}

pub fn channel_messages(channel_id: &str) -> String {
    format!("/channels/{channel_id}/messages")
}

pub fn channel_message(channel_id: &str, message_id: &str) -> String {
    format!("/channels/{channel_id}/messages/{message_id}")
}

pub fn guild(guild_id: &str) -> String {
    format!("/guilds/{guild_id}")
}

pub fn guild_role(guild_id: &str, role_id: &str) -> String {
    format!("/guilds/{guild_id}/roles/{role_id}")
}

pub fn guild_roles(guild_id: &str) -> String {
    format!("/guilds/{guild_id}/roles")
}

pub fn guild_member(guild_id: &str, user_id: &str) -> String {
    format!("/guilds/{guild_id}/members/{user_id}")
}

pub fn guild_member_role(guild_id: &str, user_id: &str, role_id: &str) -> String {
    format!("/guilds/{guild_id}/members/{user_id}/roles/{role_id}")
}

pub fn user(user_id: &str) -> String {
    format!("/users/{user_id}")
}
