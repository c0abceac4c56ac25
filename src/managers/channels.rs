//! Channels Manager
//!
//! Polymorphic channel hydration, the user -> DM channel mapping, and message
//! send/edit composed with cache reads.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::base::{BaseManager, Manager};
use crate::client::Client;
use crate::error::{ClientError, ClientResult};
use crate::models::{
    AllMessageOptions, Channel, ChannelPayload, CreateMessagePayload, EditMessagePayload, Guild,
    Keyed, Message, MessageContent, MessageMentions, MessageOptions, MessagePayload, ReplyTarget,
    User,
};
use crate::rest::{endpoints, Method, RestRequest};

/// Collection mapping a user id to their DM channel id.
pub const USER_DMS_COLLECTION: &str = "user_dms";

const MISSING_CONTENT: &str = "Either text or option is necessary.";
const MISSING_USER: &str = "Client user has not initialized.";
const EDIT_WITH_FILES: &str = "Cannot upload new files while editing a message.";

/// Channel a message call acts on: an id to look up, or a hydrated channel to reuse.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelTarget {
    Id(String),
    Channel(Box<Channel>),
}

impl ChannelTarget {
    pub fn id(&self) -> &str {
        match self {
            ChannelTarget::Id(id) => id,
            ChannelTarget::Channel(channel) => channel.id(),
        }
    }
}

impl From<&str> for ChannelTarget {
    fn from(id: &str) -> Self {
        ChannelTarget::Id(id.to_string())
    }
}

impl From<String> for ChannelTarget {
    fn from(id: String) -> Self {
        ChannelTarget::Id(id)
    }
}

impl From<Channel> for ChannelTarget {
    fn from(channel: Channel) -> Self {
        ChannelTarget::Channel(Box::new(channel))
    }
}

impl From<&Channel> for ChannelTarget {
    fn from(channel: &Channel) -> Self {
        ChannelTarget::Channel(Box::new(channel.clone()))
    }
}

/// Cached channels, collection `channels`.
#[derive(Debug)]
pub struct ChannelsManager {
    base: BaseManager<ChannelPayload>,
}

impl ChannelsManager {
    pub fn new(client: Client) -> Self {
        Self {
            base: BaseManager::new(client, "channels"),
        }
    }

    fn client(&self) -> &Client {
        self.base.client()
    }

    // == User DM Mapping ==
    /// DM channel id cached for `user`.
    pub async fn get_user_dm<K: Keyed + ?Sized + Sync>(&self, user: &K) -> ClientResult<Option<String>> {
        let value = self
            .client()
            .cache()
            .get(USER_DMS_COLLECTION, user.key())
            .await?;
        Ok(value.map(|value| match value {
            Value::String(id) => id,
            other => other.to_string(),
        }))
    }

    /// Records the DM channel id for `user`, optionally expiring after `ttl`.
    pub async fn set_user_dm<K: Keyed + ?Sized + Sync>(
        &self,
        user: &K,
        channel_id: &str,
        ttl: Option<Duration>,
    ) -> ClientResult<()> {
        let ttl_ms = ttl.map(|ttl| u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX));
        self.client()
            .cache()
            .set(
                USER_DMS_COLLECTION,
                user.key(),
                &Value::String(channel_id.to_string()),
                ttl_ms,
            )
            .await?;
        Ok(())
    }

    // == Messages ==
    /// Sends a message to `channel`.
    ///
    /// `content` is either the text or, in its place, the options. At least
    /// one of text and options is required. Content defaults to `""` when
    /// neither text nor an embed ends up in the payload.
    pub async fn send_message(
        &self,
        channel: impl Into<ChannelTarget>,
        content: Option<MessageContent>,
        option: Option<AllMessageOptions>,
    ) -> ClientResult<Message> {
        let channel = channel.into();

        let (text, option) = match content {
            Some(MessageContent::Options(options)) => (None, Some(options)),
            Some(MessageContent::Text(text)) => (Some(text), option),
            None => (None, option),
        };
        if text.is_none() && option.is_none() {
            return Err(ClientError::usage(MISSING_CONTENT));
        }

        let mut options = option
            .map(AllMessageOptions::into_options)
            .unwrap_or_default();
        let files = options.take_files();

        let mut payload = CreateMessagePayload {
            content: text.or(options.content),
            embed: options.embed,
            tts: options.tts,
            allowed_mentions: options.allowed_mentions,
            message_reference: options.reply.map(ReplyTarget::into_reference),
        };
        if payload.content.is_none() && payload.embed.is_none() {
            payload.content = Some(String::new());
        }

        let request = RestRequest::new(Method::Post, endpoints::channel_messages(channel.id()))
            .with_body(serde_json::to_value(&payload)?)
            .with_files(files);
        let response: MessagePayload = self.client().rest().request(request).await?.json()?;

        let channel = self.resolve_channel(channel).await?;
        self.message_from_payload(response, channel).await
    }

    /// Edits `message` in `channel`.
    ///
    /// Options passed as `text` win field-by-field over `option`. Attachments
    /// cannot be changed by an edit and are rejected.
    pub async fn edit_message<K: Keyed + ?Sized + Sync>(
        &self,
        channel: impl Into<ChannelTarget>,
        message: &K,
        text: Option<MessageContent>,
        option: Option<MessageOptions>,
    ) -> ClientResult<Message> {
        let channel = channel.into();

        if text.is_none() && option.is_none() {
            return Err(ClientError::usage(MISSING_CONTENT));
        }
        if self.client().user().await.is_none() {
            return Err(ClientError::usage(MISSING_USER));
        }

        let (text, options) = match text {
            Some(MessageContent::Options(options)) => {
                let options = options.into_options();
                let merged = match option {
                    Some(base) => options.merge_over(base),
                    None => options,
                };
                (None, merged)
            }
            Some(MessageContent::Text(text)) => (Some(text), option.unwrap_or_default()),
            None => (None, option.unwrap_or_default()),
        };
        if options.has_files() {
            return Err(ClientError::usage(EDIT_WITH_FILES));
        }

        let payload = EditMessagePayload {
            content: text.or(options.content),
            embed: options.embed,
            tts: options.tts,
            allowed_mentions: options.allowed_mentions,
        };
        let path = endpoints::channel_message(channel.id(), message.key());
        let response: MessagePayload = self
            .client()
            .rest()
            .patch(&path, serde_json::to_value(&payload)?)
            .await?
            .json()?;

        let channel = self.resolve_channel(channel).await?;
        self.message_from_payload(response, channel).await
    }

    async fn resolve_channel(&self, target: ChannelTarget) -> ClientResult<Option<Channel>> {
        match target {
            ChannelTarget::Id(id) => self.get(&id).await,
            ChannelTarget::Channel(channel) => Ok(Some(*channel)),
        }
    }

    async fn message_from_payload(
        &self,
        payload: MessagePayload,
        channel: Option<Channel>,
    ) -> ClientResult<Message> {
        let mentions = self.resolve_mentions(&payload).await?;
        let mut message = Message::from_payload(payload, channel);
        message.mentions = mentions;
        Ok(message)
    }

    /// Resolves a message's mentions: users from the payload, roles and
    /// channels from cache (unknown ids are skipped).
    async fn resolve_mentions(&self, payload: &MessagePayload) -> ClientResult<MessageMentions> {
        let users = payload
            .mentions
            .iter()
            .cloned()
            .map(User::from_payload)
            .collect();

        let mut roles = Vec::new();
        if let Some(guild_id) = &payload.guild_id {
            let guild_roles = self.client().roles(guild_id);
            for role_id in &payload.mention_roles {
                if let Some(role) = guild_roles.get(role_id).await? {
                    roles.push(role);
                }
            }
        }

        let mut channels = Vec::new();
        for mention in &payload.mention_channels {
            if let Some(channel) = self.get(&mention.id).await? {
                channels.push(channel);
            }
        }

        Ok(MessageMentions {
            users,
            roles,
            channels,
            everyone: payload.mention_everyone,
        })
    }

    async fn resolve_guild(&self, payload: &ChannelPayload) -> ClientResult<Option<Guild>> {
        match &payload.guild_id {
            Some(guild_id) => self.client().guilds().get(guild_id).await,
            None => Ok(None),
        }
    }
}

#[async_trait]
impl Manager for ChannelsManager {
    type Payload = ChannelPayload;
    type Entity = Channel;

    fn base(&self) -> &BaseManager<ChannelPayload> {
        &self.base
    }

    async fn hydrate(&self, payload: ChannelPayload) -> ClientResult<Channel> {
        let guild = self.resolve_guild(&payload).await?;
        Ok(Channel::hydrate(payload, guild))
    }

    fn fetch_path(&self, key: &str) -> String {
        endpoints::channel(key)
    }
}
