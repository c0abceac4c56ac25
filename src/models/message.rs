//! Message payloads, outgoing message options and the hydrated message entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::channel::Channel;
use super::guild::Role;
use super::user::{User, UserPayload};

// == Embed ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedMedia>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedMedia>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedMedia {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(EmbedFooter {
            text: text.into(),
            icon_url: None,
        });
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    /// Stamps the embed with the current time.
    pub fn timestamp_now(mut self) -> Self {
        self.timestamp = Some(Utc::now().to_rfc3339());
        self
    }
}

// == Outgoing Options ==
/// A file to upload with a message.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub name: String,
    pub blob: Vec<u8>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, blob: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            blob: blob.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllowedMentions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parse: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replied_user: Option<bool>,
}

/// Reference to the message being replied to, in wire shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
}

/// What a reply points at.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyTarget {
    /// Bare message id
    Id(String),
    /// Hydrated message; channel and guild are taken from it
    Message(Box<Message>),
    /// Already in wire shape
    Reference(MessageReference),
}

impl ReplyTarget {
    pub fn into_reference(self) -> MessageReference {
        match self {
            ReplyTarget::Id(message_id) => MessageReference {
                message_id: Some(message_id),
                ..Default::default()
            },
            ReplyTarget::Message(message) => MessageReference {
                message_id: Some(message.id),
                channel_id: Some(message.channel_id),
                guild_id: message.guild_id,
            },
            ReplyTarget::Reference(reference) => reference,
        }
    }
}

impl From<&str> for ReplyTarget {
    fn from(id: &str) -> Self {
        ReplyTarget::Id(id.to_string())
    }
}

impl From<Message> for ReplyTarget {
    fn from(message: Message) -> Self {
        ReplyTarget::Message(Box::new(message))
    }
}

impl From<MessageReference> for ReplyTarget {
    fn from(reference: MessageReference) -> Self {
        ReplyTarget::Reference(reference)
    }
}

/// Structured options for sending or editing a message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageOptions {
    pub content: Option<String>,
    pub embed: Option<Embed>,
    pub file: Option<Attachment>,
    pub files: Option<Vec<Attachment>>,
    pub tts: Option<bool>,
    pub allowed_mentions: Option<AllowedMentions>,
    pub reply: Option<ReplyTarget>,
}

impl MessageOptions {
    /// Field-by-field merge where every field set on `self` wins over `base`.
    pub fn merge_over(self, base: MessageOptions) -> MessageOptions {
        MessageOptions {
            content: self.content.or(base.content),
            embed: self.embed.or(base.embed),
            file: self.file.or(base.file),
            files: self.files.or(base.files),
            tts: self.tts.or(base.tts),
            allowed_mentions: self.allowed_mentions.or(base.allowed_mentions),
            reply: self.reply.or(base.reply),
        }
    }

    pub fn has_files(&self) -> bool {
        self.file.is_some() || self.files.as_ref().is_some_and(|files| !files.is_empty())
    }

    /// All attachments, single `file` first.
    pub fn take_files(&mut self) -> Vec<Attachment> {
        let mut files: Vec<Attachment> = self.file.take().into_iter().collect();
        files.extend(self.files.take().unwrap_or_default());
        files
    }
}

/// Options accepted by send: full options or a bare embed.
#[derive(Debug, Clone, PartialEq)]
pub enum AllMessageOptions {
    Options(MessageOptions),
    Embed(Embed),
}

impl AllMessageOptions {
    pub fn into_options(self) -> MessageOptions {
        match self {
            AllMessageOptions::Options(options) => options,
            AllMessageOptions::Embed(embed) => MessageOptions {
                embed: Some(embed),
                ..Default::default()
            },
        }
    }
}

impl From<MessageOptions> for AllMessageOptions {
    fn from(options: MessageOptions) -> Self {
        AllMessageOptions::Options(options)
    }
}

impl From<Embed> for AllMessageOptions {
    fn from(embed: Embed) -> Self {
        AllMessageOptions::Embed(embed)
    }
}

/// First argument of send/edit: plain text, or options in its place.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    Text(String),
    Options(AllMessageOptions),
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<MessageOptions> for MessageContent {
    fn from(options: MessageOptions) -> Self {
        MessageContent::Options(options.into())
    }
}

impl From<Embed> for MessageContent {
    fn from(embed: Embed) -> Self {
        MessageContent::Options(embed.into())
    }
}

/// Body of a create-message call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateMessagePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<Embed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_mentions: Option<AllowedMentions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_reference: Option<MessageReference>,
}

/// Body of an edit-message call. Files cannot be changed here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditMessagePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<Embed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_mentions: Option<AllowedMentions>,
}

// == Incoming ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMentionPayload {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: u8,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub id: String,
    pub channel_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    pub author: UserPayload,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_timestamp: Option<String>,
    #[serde(default)]
    pub tts: bool,
    #[serde(default)]
    pub mention_everyone: bool,
    #[serde(default)]
    pub mentions: Vec<UserPayload>,
    #[serde(default)]
    pub mention_roles: Vec<String>,
    #[serde(default)]
    pub mention_channels: Vec<ChannelMentionPayload>,
    #[serde(default)]
    pub embeds: Vec<Embed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_reference: Option<MessageReference>,
}

/// Mentions of a message, resolved against the cache.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageMentions {
    pub users: Vec<User>,
    pub roles: Vec<Role>,
    pub channels: Vec<Channel>,
    pub everyone: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    pub guild_id: Option<String>,
    pub author: User,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub edited_timestamp: Option<DateTime<Utc>>,
    pub tts: bool,
    pub embeds: Vec<Embed>,
    pub message_reference: Option<MessageReference>,
    /// Channel the message lives in, when known
    pub channel: Option<Channel>,
    pub mentions: MessageMentions,
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|at| at.with_timezone(&Utc))
}

impl Message {
    /// Hydrates a message. Mentions start empty; managers resolve them.
    pub fn from_payload(payload: MessagePayload, channel: Option<Channel>) -> Self {
        Self {
            timestamp: parse_timestamp(payload.timestamp.as_deref()),
            edited_timestamp: parse_timestamp(payload.edited_timestamp.as_deref()),
            id: payload.id,
            channel_id: payload.channel_id,
            guild_id: payload.guild_id,
            author: User::from_payload(payload.author),
            content: payload.content,
            tts: payload.tts,
            embeds: payload.embeds,
            message_reference: payload.message_reference,
            channel,
            mentions: MessageMentions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message() -> Message {
        let payload: MessagePayload = serde_json::from_value(json!({
            "id": "m1",
            "channel_id": "c1",
            "guild_id": "g1",
            "author": {"id": "u1", "username": "ann"},
            "content": "hello",
            "timestamp": "2021-02-03T04:05:06.000000+00:00"
        }))
        .unwrap();
        Message::from_payload(payload, None)
    }

    #[test]
    fn test_message_from_payload() {
        let msg = message();
        assert_eq!(msg.author.username, "ann");
        assert!(msg.timestamp.is_some());
        assert!(msg.edited_timestamp.is_none());
        assert!(msg.mentions.users.is_empty());
    }

    #[test]
    fn test_reply_from_message_extracts_context() {
        let reference = ReplyTarget::from(message()).into_reference();
        assert_eq!(
            reference,
            MessageReference {
                message_id: Some("m1".into()),
                channel_id: Some("c1".into()),
                guild_id: Some("g1".into()),
            }
        );
    }

    #[test]
    fn test_reply_from_id() {
        let reference = ReplyTarget::from("42").into_reference();
        assert_eq!(serde_json::to_value(&reference).unwrap(), json!({"message_id": "42"}));
    }

    #[test]
    fn test_merge_over_prefers_self() {
        let base = MessageOptions {
            content: Some("base".into()),
            tts: Some(true),
            ..Default::default()
        };
        let top = MessageOptions {
            content: Some("top".into()),
            ..Default::default()
        };
        let merged = top.merge_over(base);
        assert_eq!(merged.content.as_deref(), Some("top"));
        assert_eq!(merged.tts, Some(true));
    }

    #[test]
    fn test_take_files() {
        let mut options = MessageOptions {
            file: Some(Attachment::new("a.txt", b"a".to_vec())),
            files: Some(vec![Attachment::new("b.txt", b"b".to_vec())]),
            ..Default::default()
        };
        assert!(options.has_files());
        let files = options.take_files();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "a.txt");
        assert!(!options.has_files());
    }

    #[test]
    fn test_embed_builder_serializes_sparse() {
        let embed = Embed::new().title("t").field("k", "v", true);
        assert_eq!(
            serde_json::to_value(&embed).unwrap(),
            json!({"title": "t", "fields": [{"name": "k", "value": "v", "inline": true}]})
        );
    }
}
