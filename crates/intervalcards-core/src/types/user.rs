//! User records, conversation statuses and languages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::{IntervalCardsError, Result};

/// Messaging-platform user identifier.
pub type UserId = i64;

/// Messaging-platform chat identifier (delivery target).
pub type ChatId = i64;

pub const MIN_INTERVAL_HOURS: u8 = 1;
pub const MAX_INTERVAL_HOURS: u8 = 12;
pub const DEFAULT_INTERVAL_HOURS: u8 = 1;

/// Persisted conversation status. Decides how free text and unprefixed tokens are read.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Default,
    AddWord,
    RemoveWord,
    StartLearn,
    SetInterval,
    SetLanguage,
    SetLearningLanguage,
    FavoriteCategories,
    ConfirmAction,
}

impl UserStatus {
    pub const ALL: [UserStatus; 9] = [
        UserStatus::Default,
        UserStatus::AddWord,
        UserStatus::RemoveWord,
        UserStatus::StartLearn,
        UserStatus::SetInterval,
        UserStatus::SetLanguage,
        UserStatus::SetLearningLanguage,
        UserStatus::FavoriteCategories,
        UserStatus::ConfirmAction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Default => "default",
            UserStatus::AddWord => "add_word",
            UserStatus::RemoveWord => "remove_word",
            UserStatus::StartLearn => "start_learn",
            UserStatus::SetInterval => "set_interval",
            UserStatus::SetLanguage => "set_language",
            UserStatus::SetLearningLanguage => "set_learning_language",
            UserStatus::FavoriteCategories => "favorite_categories",
            UserStatus::ConfirmAction => "confirm_action",
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = IntervalCardsError;

    fn from_str(s: &str) -> Result<Self> {
        UserStatus::ALL
            .iter()
            .find(|status| status.as_str() == s)
            .copied()
            .ok_or_else(|| IntervalCardsError::validation(format!("Unknown user status: {s}")))
    }
}

/// Languages the bot knows about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Uk,
    De,
    Fr,
    Es,
    It,
    Pl,
}

impl Language {
    /// Languages the interface is translated into.
    pub const INTERFACE: [Language; 2] = [Language::En, Language::Uk];

    /// Languages a user may choose to learn.
    pub const LEARNING: [Language; 7] = [
        Language::En,
        Language::Uk,
        Language::De,
        Language::Fr,
        Language::Es,
        Language::It,
        Language::Pl,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Uk => "uk",
            Language::De => "de",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::It => "it",
            Language::Pl => "pl",
        }
    }

    /// English name, used in completion prompts.
    pub fn english_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Uk => "Ukrainian",
            Language::De => "German",
            Language::Fr => "French",
            Language::Es => "Spanish",
            Language::It => "Italian",
            Language::Pl => "Polish",
        }
    }

    /// Self-name with flag, used on keyboard buttons.
    pub fn native_label(&self) -> &'static str {
        match self {
            Language::En => "🇬🇧 English",
            Language::Uk => "🇺🇦 Українська",
            Language::De => "🇩🇪 Deutsch",
            Language::Fr => "🇫🇷 Français",
            Language::Es => "🇪🇸 Español",
            Language::It => "🇮🇹 Italiano",
            Language::Pl => "🇵🇱 Polski",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_lowercase();
        Language::LEARNING.iter().find(|l| l.code() == code).copied()
    }

    pub fn is_interface(&self) -> bool {
        Language::INTERFACE.contains(self)
    }

    /// Map a transport language hint (e.g. `uk`, `en-US`, `ru`) to an interface language.
    pub fn detect(hint: Option<&str>) -> Self {
        let Some(hint) = hint else {
            return Language::En;
        };
        let primary = hint.split(['-', '_']).next().unwrap_or_default();
        match Language::from_code(primary) {
            Some(lang) if lang.is_interface() => lang,
            _ => Language::En,
        }
    }
}

/// Parse and range-check an interval token.
pub fn parse_interval(token: &str) -> Result<u8> {
    let hours: u8 = token
        .trim()
        .parse()
        .map_err(|_| IntervalCardsError::validation(format!("Interval is not a number: '{token}'")))?;
    validate_interval(hours)
}

pub fn validate_interval(hours: u8) -> Result<u8> {
    if (MIN_INTERVAL_HOURS..=MAX_INTERVAL_HOURS).contains(&hours) {
        Ok(hours)
    } else {
        Err(IntervalCardsError::validation(format!(
            "Interval must be between {MIN_INTERVAL_HOURS} and {MAX_INTERVAL_HOURS} hours, got {hours}"
        )))
    }
}

/// Persisted per-user state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub chat_id: ChatId,
    pub status: UserStatus,
    pub interval_hours: u8,
    pub language: Language,
    pub learning_language: Language,
    #[serde(default)]
    pub favorite_categories: BTreeSet<String>,
}

impl UserRecord {
    /// Fresh record created on first contact.
    pub fn new(id: UserId, chat_id: ChatId, language: Language) -> Self {
        Self {
            id,
            chat_id,
            status: UserStatus::Default,
            interval_hours: DEFAULT_INTERVAL_HOURS,
            language,
            learning_language: Language::En,
            favorite_categories: BTreeSet::new(),
        }
    }

    /// Flip membership of a category; returns true when it is now selected.
    pub fn toggle_category(&mut self, category: &str) -> bool {
        if self.favorite_categories.remove(category) {
            false
        } else {
            self.favorite_categories.insert(category.to_string());
            true
        }
    }
}
