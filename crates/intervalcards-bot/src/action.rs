//! Decoding of inbound events into actions.
//!
//! Prefixed selection tokens are decoded here, ahead of any status-based
//! dispatch:
//!
//! | token | action |
//! |-------|--------|
//! | `lang:<code>` | set interface language |
//! | `learn:<code>` | set learning language |
//! | `cat:<index>` | toggle favorite category |
//! | `confirm:<yes\|no>:<action_key>` | answer a pending confirmation |
//!
//! Anything else is left for the current status to interpret.

use intervalcards_core::error::{IntervalCardsError, Result};
use intervalcards_core::types::{EventKind, IncomingEvent, Language};

use crate::categories::category;
use crate::i18n::MenuButton;

pub const LANGUAGE_PREFIX: &str = "lang:";
pub const LEARNING_LANGUAGE_PREFIX: &str = "learn:";
pub const CATEGORY_PREFIX: &str = "cat:";
pub const CONFIRM_PREFIX: &str = "confirm:";

/// Global slash commands. They override the current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Instruction,
    SetInterval,
    SetFavoriteCategories,
    MyStatus,
    Language,
    LearningLanguage,
    AddWordsSet,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::Start,
        Command::Instruction,
        Command::SetInterval,
        Command::SetFavoriteCategories,
        Command::MyStatus,
        Command::Language,
        Command::LearningLanguage,
        Command::AddWordsSet,
    ];

    /// Name without the leading slash.
    pub fn name(self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Instruction => "instruction",
            Command::SetInterval => "set_interval",
            Command::SetFavoriteCategories => "set_favorite_categories",
            Command::MyStatus => "my_status",
            Command::Language => "language",
            Command::LearningLanguage => "learning_language",
            Command::AddWordsSet => "add_words_set",
        }
    }

    /// Menu description shown by the transport.
    pub fn description(self) -> &'static str {
        match self {
            Command::Start => "Start the bot",
            Command::Instruction => "How to use the bot",
            Command::SetInterval => "Set how often words are sent",
            Command::SetFavoriteCategories => "Choose favorite word categories",
            Command::MyStatus => "Show your settings",
            Command::Language => "Change interface language",
            Command::LearningLanguage => "Change the language you learn",
            Command::AddWordsSet => "Generate a set of new words",
        }
    }

    /// Parse `/name` or `/name args`.
    pub fn parse(payload: &str) -> Option<Self> {
        let name = payload.trim().strip_prefix('/')?;
        let name = name.split_whitespace().next().unwrap_or_default();
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// Actions executed on confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKey {
    BulkAddGeneratedSet,
}

impl ActionKey {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKey::BulkAddGeneratedSet => "bulk_add_generated_set",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "bulk_add_generated_set" => Some(ActionKey::BulkAddGeneratedSet),
            _ => None,
        }
    }

    /// Selection token answering this confirmation.
    pub fn token(self, accepted: bool) -> String {
        let answer = if accepted { "yes" } else { "no" };
        format!("{CONFIRM_PREFIX}{answer}:{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Command(Command),
    Menu(MenuButton),
    SetLanguage(Language),
    SetLearningLanguage(Language),
    ToggleCategory(usize),
    Confirm { accepted: bool, key: ActionKey },
    /// Free text, read according to the current status.
    Text(String),
    /// Unprefixed selection token, read according to the current status.
    Selection(String),
}

impl Action {
    /// Decode an event. Malformed prefixed tokens and unknown slash commands
    /// are validation errors.
    pub fn decode(event: &IncomingEvent) -> Result<Self> {
        let payload = event.payload.trim();
        match event.kind {
            EventKind::Command => decode_command(payload),
            EventKind::Text if payload.starts_with('/') => decode_command(payload),
            EventKind::Text => Ok(MenuButton::from_label(payload)
                .map(Action::Menu)
                .unwrap_or_else(|| Action::Text(payload.to_string()))),
            EventKind::Selection => decode_token(payload),
        }
    }
}

fn decode_command(payload: &str) -> Result<Action> {
    Command::parse(payload)
        .map(Action::Command)
        .ok_or_else(|| IntervalCardsError::validation(format!("Unknown command: {payload}")))
}

fn decode_token(token: &str) -> Result<Action> {
    if let Some(code) = token.strip_prefix(LANGUAGE_PREFIX) {
        return interface_language(code).map(Action::SetLanguage);
    }
    if let Some(code) = token.strip_prefix(LEARNING_LANGUAGE_PREFIX) {
        return learning_language(code).map(Action::SetLearningLanguage);
    }
    if let Some(index) = token.strip_prefix(CATEGORY_PREFIX) {
        return category_index(index).map(Action::ToggleCategory);
    }
    if let Some(rest) = token.strip_prefix(CONFIRM_PREFIX) {
        let (answer, key) = rest
            .split_once(':')
            .ok_or_else(|| IntervalCardsError::validation(format!("Malformed confirmation: {token}")))?;
        let accepted = match answer {
            "yes" => true,
            "no" => false,
            other => return Err(IntervalCardsError::validation(format!("Unknown answer: {other}"))),
        };
        let key = ActionKey::parse(key)
            .ok_or_else(|| IntervalCardsError::validation(format!("Unknown action: {key}")))?;
        return Ok(Action::Confirm { accepted, key });
    }
    Ok(Action::Selection(token.to_string()))
}

/// Interface language from a bare or prefixed code.
pub fn interface_language(code: &str) -> Result<Language> {
    Language::from_code(code)
        .filter(Language::is_interface)
        .ok_or_else(|| IntervalCardsError::validation(format!("Unsupported interface language: {code}")))
}

pub fn learning_language(code: &str) -> Result<Language> {
    Language::from_code(code)
        .ok_or_else(|| IntervalCardsError::validation(format!("Unsupported learning language: {code}")))
}

/// Category index within the catalogue.
pub fn category_index(token: &str) -> Result<usize> {
    token
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|i| category(*i).is_some())
        .ok_or_else(|| IntervalCardsError::validation(format!("Unknown category: {token}")))
}
