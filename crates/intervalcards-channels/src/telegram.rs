//! Telegram Bot API channel: long polling + REST.
//!
//! `getUpdates` is polled in a background task; messages become command or
//! text events and callback queries become selection events.

use async_trait::async_trait;
use futures::stream::Stream;
use intervalcards_core::config::TelegramConfig;
use intervalcards_core::error::{IntervalCardsError, Result};
use intervalcards_core::traits::{Channel, Outbound};
use intervalcards_core::types::{
    Delivery, EventKind, IncomingEvent, Keyboard, OutgoingMessage, TextFormat,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Entry of the bot's command menu.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BotCommand {
    pub command: String,
    pub description: String,
}

impl BotCommand {
    pub fn new(command: impl Into<String>, description: impl Into<String>) -> Self {
        Self { command: command.into(), description: description.into() }
    }
}

/// Telegram Bot channel.
#[derive(Clone)]
pub struct TelegramChannel {
    config: TelegramConfig,
    client: reqwest::Client,
    commands: Vec<BotCommand>,
}

impl TelegramChannel {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            commands: Vec::new(),
        }
    }

    /// Commands registered with `setMyCommands` on connect.
    pub fn with_commands(mut self, commands: Vec<BotCommand>) -> Self {
        self.commands = commands;
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token
        )
    }

    /// Call a Bot API method and unwrap its `result`.
    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
        timeout: Option<Duration>,
    ) -> Result<T> {
        let mut request = self.client.post(self.method_url(method)).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| IntervalCardsError::Channel(format!("Telegram {method} failed: {e}")))?;

        let status = response.status();
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| IntervalCardsError::Channel(format!("Telegram {method} invalid response ({status}): {e}")))?;

        match envelope {
            ApiResponse { ok: true, result: Some(result), .. } => Ok(result),
            ApiResponse { description, .. } => Err(IntervalCardsError::Channel(format!(
                "Telegram {method} {status}: {}",
                description.unwrap_or_default()
            ))),
        }
    }

    /// Get current bot info.
    pub async fn get_me(&self) -> Result<TelegramUser> {
        self.call("getMe", &serde_json::json!({}), None).await
    }

    /// Register the command menu.
    pub async fn set_commands(&self) -> Result<()> {
        if self.commands.is_empty() {
            return Ok(());
        }
        let _: bool = self
            .call("setMyCommands", &serde_json::json!({ "commands": self.commands }), None)
            .await?;
        Ok(())
    }

    /// One long-poll round.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let body = serde_json::json!({
            "offset": offset,
            "timeout": self.config.poll_timeout_secs,
            "allowed_updates": ["message", "callback_query"],
        });
        let timeout = Duration::from_secs(self.config.poll_timeout_secs + 10);
        self.call("getUpdates", &body, Some(timeout)).await
    }

    /// Stop the client-side spinner on a pressed inline button.
    pub async fn answer_callback(&self, callback_query_id: &str) -> Result<()> {
        let _: bool = self
            .call(
                "answerCallbackQuery",
                &serde_json::json!({ "callback_query_id": callback_query_id }),
                None,
            )
            .await?;
        Ok(())
    }

    /// Start long polling and return a stream of events.
    /// Retries with exponential backoff on failures.
    pub fn start_polling(&self) -> UnboundedReceiverStream<IncomingEvent> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let channel = self.clone();

        tokio::spawn(async move {
            let mut offset: i64 = 0;
            let mut backoff_secs: u64 = 1;

            loop {
                let updates = match channel.get_updates(offset).await {
                    Ok(updates) => {
                        backoff_secs = 1;
                        updates
                    }
                    Err(e) => {
                        tracing::error!("Telegram polling failed: {e}, retrying in {backoff_secs}s...");
                        tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                for update in updates {
                    offset = offset.max(update.update_id + 1);

                    if let Some(query) = &update.callback_query {
                        if let Err(e) = channel.answer_callback(&query.id).await {
                            tracing::debug!("answerCallbackQuery failed: {e}");
                        }
                    }

                    let Some(event) = event_from_update(&update) else {
                        tracing::trace!("Ignoring update {}", update.update_id);
                        continue;
                    };
                    if tx.send(event).is_err() {
                        tracing::info!("Telegram stream closed (receiver dropped)");
                        return;
                    }
                }
            }
        });

        UnboundedReceiverStream::new(rx)
    }
}

/// Convert a raw update into an event. Updates without a usable payload yield `None`.
pub fn event_from_update(update: &Update) -> Option<IncomingEvent> {
    if let Some(query) = &update.callback_query {
        let data = query.data.as_deref()?;
        let chat_id = query.message.as_ref().map_or(query.from.id, |m| m.chat.id);
        return Some(IncomingEvent {
            channel: "telegram".into(),
            user_id: query.from.id,
            chat_id,
            kind: EventKind::Selection,
            payload: data.to_string(),
            language_hint: query.from.language_code.clone(),
            timestamp: chrono::Utc::now(),
        });
    }

    let message = update.message.as_ref()?;
    let from = message.from.as_ref()?;
    let text = message.text.as_deref()?.trim();
    if text.is_empty() {
        return None;
    }

    let (kind, payload) = if text.starts_with('/') {
        // "/start@my_bot args" → "/start args"
        let (command, rest) = text.split_once(' ').unwrap_or((text, ""));
        let command = command.split('@').next().unwrap_or(command);
        let payload = if rest.is_empty() {
            command.to_string()
        } else {
            format!("{command} {}", rest.trim())
        };
        (EventKind::Command, payload)
    } else {
        (EventKind::Text, text.to_string())
    };

    Some(IncomingEvent {
        channel: "telegram".into(),
        user_id: from.id,
        chat_id: message.chat.id,
        kind,
        payload,
        language_hint: from.language_code.clone(),
        timestamp: chrono::Utc::now(),
    })
}

/// `reply_markup` for a keyboard.
pub fn reply_markup(keyboard: &Keyboard) -> serde_json::Value {
    match keyboard {
        Keyboard::Menu(rows) => serde_json::json!({
            "keyboard": rows
                .iter()
                .map(|row| row.iter().map(|label| serde_json::json!({ "text": label })).collect::<Vec<_>>())
                .collect::<Vec<_>>(),
            "resize_keyboard": true,
        }),
        Keyboard::Inline(rows) => serde_json::json!({
            "inline_keyboard": rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|b| serde_json::json!({ "text": b.label, "callback_data": b.token }))
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>(),
        }),
    }
}

#[async_trait]
impl Outbound for TelegramChannel {
    async fn send(&self, message: OutgoingMessage) -> Result<Delivery> {
        let mut body = serde_json::json!({
            "chat_id": message.chat_id,
            "text": message.text,
        });
        if let Some(format) = message.format {
            body["parse_mode"] = serde_json::Value::from(match format {
                TextFormat::MarkdownV2 => "MarkdownV2",
            });
        }
        if let Some(keyboard) = &message.keyboard {
            body["reply_markup"] = reply_markup(keyboard);
        }

        let sent: TelegramMessage = self.call("sendMessage", &body, None).await?;
        Ok(Delivery { chat_id: sent.chat.id, message_id: Some(sent.message_id) })
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str { "telegram" }

    async fn connect(&self) -> Result<()> {
        if self.config.bot_token.trim().is_empty() {
            return Err(IntervalCardsError::config(
                "Telegram bot token missing (set TELEGRAM_BOT_TOKEN or telegram.bot_token)",
            ));
        }
        let me = self.get_me().await?;
        tracing::info!(
            "🤖 Telegram bot: @{} ({})",
            me.username.as_deref().unwrap_or("unknown"),
            me.id
        );
        self.set_commands().await?;
        Ok(())
    }

    async fn listen(&self) -> Result<Box<dyn Stream<Item = IncomingEvent> + Send + Unpin>> {
        Ok(Box::new(self.start_polling()))
    }
}

// --- Telegram API Types ---

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub username: Option<String>,
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramMessage {
    pub message_id: i64,
    pub from: Option<TelegramUser>,
    pub chat: TelegramChat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: TelegramUser,
    pub message: Option<TelegramMessage>,
    pub data: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<TelegramMessage>,
    pub callback_query: Option<CallbackQuery>,
}
