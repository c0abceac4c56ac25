//! Payload and entity models
//!
//! Payloads are the wire shapes stored in the cache; entities are what
//! managers hand back after hydration.

pub mod channel;
pub mod guild;
pub mod message;
pub mod user;

// Re-export commonly used types
pub use channel::{
    BaseChannel, CategoryChannel, Channel, ChannelKind, ChannelPayload, DmChannel,
    GuildChannel, GuildTextChannel, VoiceChannel,
};
pub use guild::{Guild, GuildPayload, Member, MemberPayload, Role, RolePayload};
pub use message::{
    AllMessageOptions, AllowedMentions, Attachment, ChannelMentionPayload, CreateMessagePayload,
    EditMessagePayload, Embed, EmbedField, EmbedFooter, EmbedMedia, Message, MessageContent,
    MessageMentions, MessageOptions, MessagePayload, MessageReference, ReplyTarget,
};
pub use user::{User, UserPayload};

/// Anything addressable by its cache key (the remote id).
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for str {
    fn key(&self) -> &str {
        self
    }
}

impl Keyed for String {
    fn key(&self) -> &str {
        self
    }
}

impl Keyed for User {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Guild {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Role {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Member {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Channel {
    fn key(&self) -> &str {
        self.id()
    }
}

impl Keyed for Message {
    fn key(&self) -> &str {
        &self.id
    }
}
