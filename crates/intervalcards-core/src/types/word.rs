//! Dictionary entries.

use serde::{Deserialize, Serialize};

use super::user::UserId;
use crate::error::{IntervalCardsError, Result};

/// Separator between the parts of a user-typed item: `word / translation / comment / example`.
pub const ITEM_SEPARATOR: char = '/';

/// A stored dictionary entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordEntry {
    pub id: String,
    pub user_id: UserId,
    pub word: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl WordEntry {
    /// Case-insensitive comparison of the headword.
    pub fn same_word(&self, other: &str) -> bool {
        self.word.to_lowercase() == other.trim().to_lowercase()
    }
}

/// An entry that has not been stored yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NewWord {
    pub word: String,
    pub translation: Option<String>,
    pub comment: Option<String>,
    pub example: Option<String>,
}

impl NewWord {
    pub fn new(word: impl Into<String>, translation: Option<String>) -> Self {
        Self {
            word: word.into(),
            translation,
            ..Default::default()
        }
    }

    /// Parse raw user text, e.g. `cat / кіт / pet / the cat sleeps`.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.split(ITEM_SEPARATOR).map(str::trim);
        let word = parts.next().unwrap_or_default().to_string();
        if word.is_empty() {
            return Err(IntervalCardsError::validation("Word must not be empty"));
        }

        let mut optional = || parts.next().filter(|p| !p.is_empty()).map(String::from);
        let translation = optional();
        let comment = optional();
        let example = optional();

        Ok(Self { word, translation, comment, example })
    }
}

/// True when `word` is already present in `dictionary`, ignoring case.
pub fn contains_word(dictionary: &[WordEntry], word: &str) -> bool {
    dictionary.iter().any(|entry| entry.same_word(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_word_and_translation() {
        let item = NewWord::parse("cat / кіт").unwrap();
        assert_eq!(item.word, "cat");
        assert_eq!(item.translation.as_deref(), Some("кіт"));
        assert!(item.comment.is_none());
        assert!(item.example.is_none());
    }

    #[test]
    fn test_parse_all_parts() {
        let item = NewWord::parse("run/бігти/verb/I run every day").unwrap();
        assert_eq!(item.word, "run");
        assert_eq!(item.translation.as_deref(), Some("бігти"));
        assert_eq!(item.comment.as_deref(), Some("verb"));
        assert_eq!(item.example.as_deref(), Some("I run every day"));
    }

    #[test]
    fn test_parse_skips_empty_optional_parts() {
        let item = NewWord::parse("dog //  / a dog barks").unwrap();
        assert_eq!(item.word, "dog");
        assert!(item.translation.is_none());
        assert!(item.comment.is_none());
        assert_eq!(item.example.as_deref(), Some("a dog barks"));
    }

    #[test]
    fn test_parse_rejects_empty_word() {
        assert!(NewWord::parse("").is_err());
        assert!(NewWord::parse("   ").is_err());
        assert!(NewWord::parse(" / translation").is_err());
    }

    #[test]
    fn test_contains_word_ignores_case() {
        let dict = vec![WordEntry {
            id: "1".into(),
            user_id: 1,
            word: "Cat".into(),
            translation: None,
            example: None,
            comment: None,
        }];
        assert!(contains_word(&dict, "cat"));
        assert!(contains_word(&dict, " CAT "));
        assert!(!contains_word(&dict, "dog"));
    }
}
