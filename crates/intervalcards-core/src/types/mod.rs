//! Shared data model.

pub mod message;
pub mod user;
pub mod word;

pub use message::{Delivery, EventKind, IncomingEvent, InlineButton, Keyboard, OutgoingMessage, TextFormat};
pub use user::{
    ChatId, Language, UserId, UserRecord, UserStatus, DEFAULT_INTERVAL_HOURS, MAX_INTERVAL_HOURS,
    MIN_INTERVAL_HOURS, parse_interval, validate_interval,
};
pub use word::{ITEM_SEPARATOR, NewWord, WordEntry, contains_word};
