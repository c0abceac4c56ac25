//! Channel payload and the closed set of hydrated channel variants.

use serde::{Deserialize, Serialize};

use super::guild::Guild;
use super::user::{User, UserPayload};

/// Channel as sent by the remote API. Guild-only and DM-only fields are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelPayload {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default)]
    pub nsfw: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit_per_user: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipients: Option<Vec<UserPayload>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

// == Channel Kind ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    GuildText,
    Dm,
    GuildVoice,
    GroupDm,
    GuildCategory,
    GuildNews,
    GuildStore,
}

/// Wire discriminant for each variant.
const KIND_CODES: [(u8, ChannelKind); 7] = [
    (0, ChannelKind::GuildText),
    (1, ChannelKind::Dm),
    (2, ChannelKind::GuildVoice),
    (3, ChannelKind::GroupDm),
    (4, ChannelKind::GuildCategory),
    (5, ChannelKind::GuildNews),
    (6, ChannelKind::GuildStore),
];

type Constructor = fn(ChannelPayload, Option<Guild>) -> Channel;

/// Variant constructor for each kind.
const CONSTRUCTORS: [(ChannelKind, Constructor); 7] = [
    (ChannelKind::GuildText, |p, g| Channel::Text(GuildTextChannel::new(p, g))),
    (ChannelKind::Dm, |p, _| Channel::Dm(DmChannel::new(p))),
    (ChannelKind::GuildVoice, |p, g| Channel::Voice(VoiceChannel::new(p, g))),
    (ChannelKind::GroupDm, |p, _| Channel::GroupDm(DmChannel::new(p))),
    (ChannelKind::GuildCategory, |p, g| Channel::Category(CategoryChannel::new(p, g))),
    (ChannelKind::GuildNews, |p, g| Channel::News(GuildTextChannel::new(p, g))),
    (ChannelKind::GuildStore, |p, g| Channel::Store(GuildChannel::new(p, g))),
];

impl ChannelKind {
    pub fn from_code(code: u8) -> Option<Self> {
        KIND_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, kind)| *kind)
    }

    pub fn code(&self) -> u8 {
        KIND_CODES
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(code, _)| *code)
            .unwrap_or(u8::MAX)
    }

    pub fn is_guild_scoped(&self) -> bool {
        !matches!(self, ChannelKind::Dm | ChannelKind::GroupDm)
    }

    fn constructor(&self) -> Option<Constructor> {
        CONSTRUCTORS
            .iter()
            .find(|(kind, _)| kind == self)
            .map(|(_, ctor)| *ctor)
    }
}

// == Variants ==
/// Fields shared by every channel.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseChannel {
    pub id: String,
    pub kind_code: u8,
}

impl BaseChannel {
    fn new(payload: ChannelPayload) -> Self {
        Self {
            id: payload.id,
            kind_code: payload.kind,
        }
    }
}

/// Fields shared by guild-scoped channels. `guild` is resolved from cache.
#[derive(Debug, Clone, PartialEq)]
pub struct GuildChannel {
    pub id: String,
    pub guild_id: Option<String>,
    pub guild: Option<Guild>,
    pub name: String,
    pub position: i64,
    pub parent_id: Option<String>,
    pub nsfw: bool,
}

impl GuildChannel {
    fn new(payload: ChannelPayload, guild: Option<Guild>) -> Self {
        Self {
            id: payload.id,
            guild_id: payload.guild_id,
            guild,
            name: payload.name.unwrap_or_default(),
            position: payload.position.unwrap_or_default(),
            parent_id: payload.parent_id,
            nsfw: payload.nsfw,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuildTextChannel {
    pub base: GuildChannel,
    pub topic: Option<String>,
    pub last_message_id: Option<String>,
    pub rate_limit_per_user: u32,
}

impl GuildTextChannel {
    fn new(payload: ChannelPayload, guild: Option<Guild>) -> Self {
        let topic = payload.topic.clone();
        let last_message_id = payload.last_message_id.clone();
        let rate_limit_per_user = payload.rate_limit_per_user.unwrap_or_default();
        Self {
            base: GuildChannel::new(payload, guild),
            topic,
            last_message_id,
            rate_limit_per_user,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoiceChannel {
    pub base: GuildChannel,
    pub bitrate: u32,
    pub user_limit: u32,
}

impl VoiceChannel {
    fn new(payload: ChannelPayload, guild: Option<Guild>) -> Self {
        let bitrate = payload.bitrate.unwrap_or_default();
        let user_limit = payload.user_limit.unwrap_or_default();
        Self {
            base: GuildChannel::new(payload, guild),
            bitrate,
            user_limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryChannel {
    pub base: GuildChannel,
}

impl CategoryChannel {
    fn new(payload: ChannelPayload, guild: Option<Guild>) -> Self {
        Self {
            base: GuildChannel::new(payload, guild),
        }
    }
}

/// One-to-one or group direct-message channel.
#[derive(Debug, Clone, PartialEq)]
pub struct DmChannel {
    pub id: String,
    pub name: Option<String>,
    pub recipients: Vec<User>,
    pub last_message_id: Option<String>,
    pub owner_id: Option<String>,
}

impl DmChannel {
    fn new(payload: ChannelPayload) -> Self {
        Self {
            id: payload.id,
            name: payload.name,
            recipients: payload
                .recipients
                .unwrap_or_default()
                .into_iter()
                .map(User::from_payload)
                .collect(),
            last_message_id: payload.last_message_id,
            owner_id: payload.owner_id,
        }
    }
}

// == Channel ==
/// Hydrated channel. Chosen once per payload from its `type` discriminant.
#[derive(Debug, Clone, PartialEq)]
pub enum Channel {
    Text(GuildTextChannel),
    News(GuildTextChannel),
    Voice(VoiceChannel),
    Category(CategoryChannel),
    Store(GuildChannel),
    Dm(DmChannel),
    GroupDm(DmChannel),
    /// Discriminant outside the known table
    Unknown(BaseChannel),
}

impl Channel {
    /// Builds the variant selected by `payload.kind`. `guild` is the resolved
    /// owning guild for guild-scoped payloads, if cached.
    pub fn hydrate(payload: ChannelPayload, guild: Option<Guild>) -> Self {
        match ChannelKind::from_code(payload.kind).and_then(|kind| kind.constructor()) {
            Some(construct) => construct(payload, guild),
            None => Channel::Unknown(BaseChannel::new(payload)),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Channel::Text(c) | Channel::News(c) => &c.base.id,
            Channel::Voice(c) => &c.base.id,
            Channel::Category(c) => &c.base.id,
            Channel::Store(c) => &c.id,
            Channel::Dm(c) | Channel::GroupDm(c) => &c.id,
            Channel::Unknown(c) => &c.id,
        }
    }

    pub fn kind(&self) -> Option<ChannelKind> {
        match self {
            Channel::Text(_) => Some(ChannelKind::GuildText),
            Channel::News(_) => Some(ChannelKind::GuildNews),
            Channel::Voice(_) => Some(ChannelKind::GuildVoice),
            Channel::Category(_) => Some(ChannelKind::GuildCategory),
            Channel::Store(_) => Some(ChannelKind::GuildStore),
            Channel::Dm(_) => Some(ChannelKind::Dm),
            Channel::GroupDm(_) => Some(ChannelKind::GroupDm),
            Channel::Unknown(_) => None,
        }
    }

    fn guild_channel(&self) -> Option<&GuildChannel> {
        match self {
            Channel::Text(c) | Channel::News(c) => Some(&c.base),
            Channel::Voice(c) => Some(&c.base),
            Channel::Category(c) => Some(&c.base),
            Channel::Store(c) => Some(c),
            _ => None,
        }
    }

    pub fn guild_id(&self) -> Option<&str> {
        self.guild_channel().and_then(|c| c.guild_id.as_deref())
    }

    pub fn guild(&self) -> Option<&Guild> {
        self.guild_channel().and_then(|c| c.guild.as_ref())
    }

    /// Whether messages can be sent to this channel.
    pub fn is_text_based(&self) -> bool {
        matches!(
            self,
            Channel::Text(_) | Channel::News(_) | Channel::Dm(_) | Channel::GroupDm(_)
        )
    }
}
