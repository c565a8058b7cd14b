//! Dictionary handlers: show, add, remove.

use intervalcards_core::error::{IntervalCardsError, Result};
use intervalcards_core::types::{NewWord, UserRecord, UserStatus, WordEntry, contains_word};

use super::Reply;
use crate::conversation::Conversation;
use crate::i18n::{Text, fill, t};
use crate::keyboards;

/// `1. word — translation` lines.
pub(crate) fn format_dictionary(words: &[WordEntry]) -> String {
    words
        .iter()
        .enumerate()
        .map(|(i, w)| match &w.translation {
            Some(translation) => format!("{}. {} — {translation}", i + 1, w.word),
            None => format!("{}. {}", i + 1, w.word),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl Conversation {
    pub(crate) async fn show_all(&self, user: &UserRecord) -> Result<Reply> {
        let words = self.store.list_words(user.id).await?;
        let text = if words.is_empty() {
            t(user.language, Text::NoWords).to_string()
        } else {
            let header = fill(
                t(user.language, Text::DictionaryHeader),
                &[("count", words.len().to_string().as_str())],
            );
            format!("{header}\n{}", format_dictionary(&words))
        };
        Ok(Reply::new(text).with_keyboard(self.menu_for(user)))
    }

    pub(crate) fn enter_add_word(&self, user: &mut UserRecord) -> Reply {
        user.status = UserStatus::AddWord;
        Reply::new(t(user.language, Text::AddWordPrompt)).with_keyboard(keyboards::adding_menu(user.language))
    }

    /// Parse and store one entry; the user stays in `add_word`.
    pub(crate) async fn add_word(&self, user: &UserRecord, raw: &str) -> Result<Reply> {
        let item = NewWord::parse(raw)?;
        let words = self.store.list_words(user.id).await?;
        if contains_word(&words, &item.word) {
            return Err(IntervalCardsError::duplicate(item.word));
        }

        let entry = self.store.add_word(user.id, item).await?;
        tracing::info!(user_id = user.id, "📝 Word added: {}", entry.word);
        let text = fill(t(user.language, Text::WordAdded), &[("word", entry.word.as_str())]);
        Ok(Reply::new(text).with_keyboard(keyboards::adding_menu(user.language)))
    }

    pub(crate) async fn enter_remove_word(&self, user: &mut UserRecord) -> Result<Reply> {
        let words = self.store.list_words(user.id).await?;
        if words.is_empty() {
            user.status = UserStatus::Default;
            return Ok(Reply::new(t(user.language, Text::NoWords))
                .with_keyboard(keyboards::main_menu(user.language)));
        }
        user.status = UserStatus::RemoveWord;
        Ok(Reply::new(t(user.language, Text::ChooseWordToRemove)).with_keyboard(keyboards::remove_words(&words)))
    }

    /// Delete by id; the user stays in `remove_word` while words remain.
    pub(crate) async fn remove_word(&self, user: &mut UserRecord, word_id: &str) -> Result<Reply> {
        if !self.store.remove_word(user.id, word_id).await? {
            return Err(IntervalCardsError::not_found(format!("Word {word_id}")));
        }
        tracing::info!(user_id = user.id, word_id, "🗑️ Word removed");

        let remaining = self.store.list_words(user.id).await?;
        let reply = Reply::new(t(user.language, Text::WordRemoved));
        if remaining.is_empty() {
            user.status = UserStatus::Default;
            return Ok(reply.with_keyboard(keyboards::main_menu(user.language)));
        }
        Ok(reply.with_keyboard(keyboards::remove_words(&remaining)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_dictionary() {
        let entry = |word: &str, translation: Option<&str>| WordEntry {
            id: word.into(),
            user_id: 1,
            word: word.into(),
            translation: translation.map(String::from),
            example: None,
            comment: None,
        };
        let text = format_dictionary(&[entry("cat", Some("кіт")), entry("dog", None)]);
        assert_eq!(text, "1. cat — кіт\n2. dog");
    }
}
