//! Telegram Bot API transport.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};
use watch_core::error::TransportError;
use watch_core::traits::Transport;
use watch_core::types::{InboundMessage, OutboundMessage, RecipientId, ReplyKeyboard, TextFormat};

/// Telegram Bot API configuration.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub token: String,
    pub base_url: String,
    pub request_timeout: Duration,
}

impl TelegramConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.telegram.org";

    /// Create config directly with a bot token.
    pub fn new(token: String) -> Self {
        Self {
            token,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(15),
        }
    }

    /// Load the bot token from an environment variable.
    pub fn from_env(var: &str) -> Result<Self, TransportError> {
        let token = std::env::var(var)
            .map_err(|_| TransportError::Configuration(format!("{} not set", var)))?;
        Ok(Self::new(token))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url.trim_end_matches('/'), self.token, method)
    }
}

/// Bot API envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct User {
    #[allow(dead_code)]
    id: i64,
    username: Option<String>,
    first_name: String,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Chat,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<Message>,
}

#[derive(Debug, Serialize)]
struct KeyboardButton<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct ReplyKeyboardMarkup<'a> {
    keyboard: Vec<Vec<KeyboardButton<'a>>>,
    resize_keyboard: bool,
}

impl<'a> From<&'a ReplyKeyboard> for ReplyKeyboardMarkup<'a> {
    fn from(keyboard: &'a ReplyKeyboard) -> Self {
        Self {
            keyboard: vec![keyboard
                .buttons
                .iter()
                .map(|b| KeyboardButton { text: b })
                .collect()],
            resize_keyboard: keyboard.resize,
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<ReplyKeyboardMarkup<'a>>,
}

impl<'a> SendMessageRequest<'a> {
    fn new(recipient: RecipientId, message: &'a OutboundMessage) -> Self {
        Self {
            chat_id: recipient.0,
            text: &message.text,
            parse_mode: match message.format {
                TextFormat::Markdown => Some("Markdown"),
                TextFormat::Plain => None,
            },
            reply_markup: message.keyboard.as_ref().map(ReplyKeyboardMarkup::from),
        }
    }
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest {
    offset: i64,
    timeout: u64,
    allowed_updates: [&'static str; 1],
}

/// Telegram bot client using long polling.
pub struct TelegramTransport {
    config: TelegramConfig,
    client: Client,
    next_offset: AtomicI64,
}

impl TelegramTransport {
    /// Create a new Telegram client.
    pub fn new(config: TelegramConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Connection(e.without_url().to_string()))?;

        Ok(Self {
            config,
            client,
            next_offset: AtomicI64::new(0),
        })
    }

    /// Create from environment variables.
    pub fn from_env(var: &str) -> Result<Self, TransportError> {
        Self::new(TelegramConfig::from_env(var)?)
    }

    async fn call<B, T>(&self, method: &str, body: &B, timeout: Duration) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        // Errors are stripped of the URL, which embeds the token.
        let resp = self
            .client
            .post(self.config.method_url(method))
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.without_url().to_string()))?;

        let status = resp.status();
        let envelope: ApiResponse<T> = resp
            .json()
            .await
            .map_err(|e| TransportError::ApiError(format!("{}: {}", status, e.without_url())))?;

        unwrap_envelope(method, envelope)
    }
}

fn unwrap_envelope<T>(method: &str, envelope: ApiResponse<T>) -> Result<T, TransportError> {
    match envelope {
        ApiResponse { ok: true, result: Some(result), .. } => Ok(result),
        ApiResponse { description, error_code, .. } => Err(TransportError::ApiError(format!(
            "{} failed ({}): {}",
            method,
            error_code.unwrap_or_default(),
            description.unwrap_or_else(|| "no description".to_string())
        ))),
    }
}

/// Keep text messages and advance past everything else.
fn collect_messages(updates: Vec<Update>) -> (Vec<InboundMessage>, Option<i64>) {
    let next_offset = updates.iter().map(|u| u.update_id + 1).max();
    let messages = updates
        .into_iter()
        .filter_map(|u| u.message)
        .filter_map(|m| m.text.map(|text| InboundMessage::new(m.chat.id, text)))
        .collect();
    (messages, next_offset)
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send(&self, recipient: RecipientId, message: &OutboundMessage) -> Result<(), TransportError> {
        let request = SendMessageRequest::new(recipient, message);
        let _: serde_json::Value = self
            .call("sendMessage", &request, self.config.request_timeout)
            .await?;
        debug!("Sent {} bytes to chat {}", message.text.len(), recipient);
        Ok(())
    }

    async fn receive(&self, timeout: Duration) -> Result<Vec<InboundMessage>, TransportError> {
        let request = GetUpdatesRequest {
            offset: self.next_offset.load(Ordering::SeqCst),
            timeout: timeout.as_secs(),
            allowed_updates: ["message"],
        };

        // The server holds the request for up to `timeout`.
        let updates: Vec<Update> = self
            .call("getUpdates", &request, timeout + self.config.request_timeout)
            .await?;

        let (messages, next_offset) = collect_messages(updates);
        if let Some(offset) = next_offset {
            self.next_offset.fetch_max(offset, Ordering::SeqCst);
        }
        Ok(messages)
    }

    async fn identity(&self) -> Result<String, TransportError> {
        let me: User = self
            .call("getMe", &serde_json::json!({}), self.config.request_timeout)
            .await?;
        Ok(me.username.unwrap_or_else(|| {
            warn!("Bot has no username, using first name");
            me.first_name
        }))
    }

    fn name(&self) -> &str {
        "Telegram"
    }
}
