//! Discord channel sink over the bot REST API.
//!
//! Only three endpoints are used:
//! - `GET  /users/@me` once at startup to check the token
//! - `GET  /channels/{id}` at the start of every tick
//! - `POST /channels/{id}/messages` per notification, one embed each
//!
//! There is no gateway connection; the relay only ever writes.

use super::ChatSink;
use crate::error::SinkError;
use crate::models::NotificationMessage;
use crate::utils::{truncate_chars, truncate_for_log};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

/// Default REST base, versioned.
pub const DISCORD_API_BASE: &str = "https://discord.com/api/v10/";

const TITLE_LIMIT: usize = 256;
const DESCRIPTION_LIMIT: usize = 4096;
const FIELD_NAME_LIMIT: usize = 256;
const FIELD_VALUE_LIMIT: usize = 1024;
/// Discord rejects empty embed strings.
const EMPTY_PLACEHOLDER: &str = "-";

/// The bot account behind a token.
#[derive(Debug, Clone, Deserialize)]
pub struct BotUser {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Serialize, PartialEq)]
struct EmbedFieldPayload {
    name: String,
    value: String,
    inline: bool,
}

#[derive(Debug, Serialize, PartialEq)]
struct EmbedPayload {
    title: String,
    description: String,
    color: u32,
    timestamp: String,
    fields: Vec<EmbedFieldPayload>,
}

#[derive(Debug, Serialize, PartialEq)]
struct CreateMessagePayload {
    embeds: Vec<EmbedPayload>,
}

fn embed_text(s: &str, limit: usize) -> String {
    if s.trim().is_empty() {
        EMPTY_PLACEHOLDER.to_string()
    } else {
        truncate_chars(s, limit)
    }
}

impl From<&NotificationMessage> for CreateMessagePayload {
    fn from(msg: &NotificationMessage) -> Self {
        Self {
            embeds: vec![EmbedPayload {
                title: embed_text(&msg.title, TITLE_LIMIT),
                description: embed_text(&msg.description, DESCRIPTION_LIMIT),
                color: msg.color.rgb(),
                timestamp: msg.timestamp.to_rfc3339(),
                fields: msg
                    .fields
                    .iter()
                    .map(|f| EmbedFieldPayload {
                        name: embed_text(&f.name, FIELD_NAME_LIMIT),
                        value: embed_text(&f.value, FIELD_VALUE_LIMIT),
                        inline: false,
                    })
                    .collect(),
            }],
        }
    }
}

/// Sink posting embeds to one channel as a bot.
#[derive(Debug, Clone)]
pub struct DiscordSink {
    client: Client,
    token: Option<String>,
    channel_id: u64,
    api_base: Url,
}

impl DiscordSink {
    /// `token` of `None` or a `channel_id` of 0 leave the sink permanently
    /// unavailable rather than failing construction.
    pub fn new(client: Client, token: Option<String>, channel_id: u64) -> Self {
        Self {
            client,
            token: token.filter(|t| !t.trim().is_empty()),
            channel_id,
            api_base: Url::parse(DISCORD_API_BASE).expect("static Discord URL is valid"),
        }
    }

    pub fn with_api_base(mut self, mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        self.api_base = base;
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn authorization(&self) -> Result<String, SinkError> {
        self.token
            .as_ref()
            .map(|t| format!("Bot {t}"))
            .ok_or(SinkError::NotConfigured("DISCORD_TOKEN is not set"))
    }

    fn channel_url(&self, suffix: &str) -> Result<Url, SinkError> {
        if self.channel_id == 0 {
            return Err(SinkError::NotConfigured("DISCORD_CHANNEL_ID is not set"));
        }
        Ok(self
            .api_base
            .join(&format!("channels/{}{}", self.channel_id, suffix))?)
    }

    /// Check the token and return the bot account it belongs to.
    #[instrument(level = "info", skip_all)]
    pub async fn login(&self) -> Result<BotUser, SinkError> {
        let url = self.api_base.join("users/@me")?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, self.authorization()?)
            .send()
            .await?;
        Ok(check(response).await?.json::<BotUser>().await?)
    }
}

async fn check(response: Response) -> Result<Response, SinkError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SinkError::Status {
        status: status.as_u16(),
        body: truncate_for_log(&body, 200),
    })
}

impl ChatSink for DiscordSink {
    #[instrument(level = "debug", skip_all, fields(channel_id = self.channel_id))]
    async fn ready(&self) -> Result<(), SinkError> {
        let url = self.channel_url("")?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, self.authorization()?)
            .send()
            .await?;
        check(response).await?;
        debug!("Channel resolved");
        Ok(())
    }

    #[instrument(level = "debug", skip_all, fields(channel_id = self.channel_id))]
    async fn send(&self, message: &NotificationMessage) -> Result<(), SinkError> {
        let url = self.channel_url("/messages")?;
        let payload = CreateMessagePayload::from(message);
        let response = self
            .client
            .post(url)
            .header(reqwest::header::AUTHORIZATION, self.authorization()?)
            .json(&payload)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}
