//! # IntervalCards Channels
//! Messaging transports implementing `Channel`.

pub mod telegram;

pub use telegram::{BotCommand, TelegramChannel};
