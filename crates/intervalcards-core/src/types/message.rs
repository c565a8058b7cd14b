//! Inbound events and outbound messages exchanged with the messaging transport.

use serde::{Deserialize, Serialize};

use super::user::{ChatId, UserId};

/// How an inbound payload reached the bot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Slash command, e.g. `/start`.
    Command,
    /// Free text typed by the user (including reply-keyboard labels).
    Text,
    /// Opaque token attached to an inline option.
    Selection,
}

/// Incoming event from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingEvent {
    pub channel: String,
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub kind: EventKind,
    pub payload: String,
    /// Language reported by the transport for this user, if any.
    pub language_hint: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl IncomingEvent {
    pub fn new(user_id: UserId, chat_id: ChatId, kind: EventKind, payload: impl Into<String>) -> Self {
        Self {
            channel: "test".into(),
            user_id,
            chat_id,
            kind,
            payload: payload.into(),
            language_hint: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn command(user_id: UserId, chat_id: ChatId, payload: impl Into<String>) -> Self {
        Self::new(user_id, chat_id, EventKind::Command, payload)
    }

    pub fn text(user_id: UserId, chat_id: ChatId, payload: impl Into<String>) -> Self {
        Self::new(user_id, chat_id, EventKind::Text, payload)
    }

    pub fn selection(user_id: UserId, chat_id: ChatId, payload: impl Into<String>) -> Self {
        Self::new(user_id, chat_id, EventKind::Selection, payload)
    }
}

/// Text formatting understood by the transport.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TextFormat {
    MarkdownV2,
}

/// A single inline option: visible label + token delivered back on press.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub token: String,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self { label: label.into(), token: token.into() }
    }
}

/// Keyboard attached to an outgoing message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Keyboard {
    /// Persistent menu; pressing a button sends its label as text.
    Menu(Vec<Vec<String>>),
    /// Options attached to the message; pressing one sends its token.
    Inline(Vec<Vec<InlineButton>>),
}

/// Outgoing message to a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub format: Option<TextFormat>,
    pub keyboard: Option<Keyboard>,
}

impl OutgoingMessage {
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            format: None,
            keyboard: None,
        }
    }

    pub fn markdown(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            format: Some(TextFormat::MarkdownV2),
            ..Self::text(chat_id, text)
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Confirmation returned by the transport after a send.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Delivery {
    pub chat_id: ChatId,
    pub message_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_constructors() {
        let ev = IncomingEvent::command(1, 2, "/start");
        assert_eq!(ev.kind, EventKind::Command);
        assert_eq!(ev.user_id, 1);
        assert_eq!(ev.chat_id, 2);

        assert_eq!(IncomingEvent::text(1, 2, "cat").kind, EventKind::Text);
        assert_eq!(IncomingEvent::selection(1, 2, "3").kind, EventKind::Selection);
    }

    #[test]
    fn test_outgoing_builders() {
        let keyboard = Keyboard::Menu(vec![vec!["Finish".into()]]);
        let msg = OutgoingMessage::markdown(7, "*hi*").with_keyboard(keyboard.clone());
        assert_eq!(msg.format, Some(TextFormat::MarkdownV2));
        assert_eq!(msg.keyboard, Some(keyboard));
        assert!(OutgoingMessage::text(7, "hi").format.is_none());
    }
}
