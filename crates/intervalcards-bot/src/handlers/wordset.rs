//! Generated word sets and the confirm-action table.

use intervalcards_core::error::{IntervalCardsError, Result};
use intervalcards_core::types::{NewWord, UserRecord, UserStatus};
use intervalcards_wordsets::{WordSetRequest, normalize};
use std::collections::HashSet;

use super::Reply;
use crate::action::ActionKey;
use crate::conversation::Conversation;
use crate::i18n::{Text, fill, t};
use crate::keyboards;

impl Conversation {
    /// Generate a set for the favorite categories, excluding the user's words,
    /// and ask for confirmation. The status only changes once a set is offered.
    pub(crate) async fn add_words_set(&self, user: &mut UserRecord) -> Result<Reply> {
        if user.favorite_categories.is_empty() {
            return Ok(Reply::new(t(user.language, Text::NeedFavoriteCategories))
                .with_keyboard(self.menu_for(user)));
        }

        let existing = self.store.list_words(user.id).await?;
        let request = WordSetRequest {
            categories: user.favorite_categories.iter().cloned().collect(),
            learning_language: user.learning_language.english_name().to_string(),
            native_language: user.language.english_name().to_string(),
            count: self.settings.words_per_set,
            excluded_words: existing.into_iter().map(|w| w.word).collect(),
        };
        let result = self.generator.generate(&request).await?;

        let listing = result
            .words
            .iter()
            .enumerate()
            .map(|(i, w)| format!("{}. {} — {}", i + 1, w.word, w.translation))
            .collect::<Vec<_>>()
            .join("\n");
        self.store_pending(user.id, result.words);
        user.status = UserStatus::ConfirmAction;

        let text = fill(t(user.language, Text::WordSetProposal), &[("words", listing.as_str())]);
        Ok(Reply::new(text).with_keyboard(keyboards::confirm(user.language, ActionKey::BulkAddGeneratedSet)))
    }

    /// "no" discards the pending action; "yes" runs the action for `key`.
    pub(crate) async fn confirm(&self, user: &mut UserRecord, accepted: bool, key: ActionKey) -> Result<Reply> {
        if !accepted {
            self.take_pending(user.id);
            user.status = UserStatus::Default;
            return Ok(Reply::new(t(user.language, Text::ActionCancelled))
                .with_keyboard(keyboards::main_menu(user.language)));
        }
        match key {
            ActionKey::BulkAddGeneratedSet => self.bulk_add_generated_set(user).await,
        }
    }

    /// Insert every pending word that is not already in the dictionary.
    async fn bulk_add_generated_set(&self, user: &mut UserRecord) -> Result<Reply> {
        user.status = UserStatus::Default;
        let words = self
            .take_pending(user.id)
            .ok_or_else(|| IntervalCardsError::not_found("No generated word set awaiting confirmation"))?;

        let mut known: HashSet<String> = self
            .store
            .list_words(user.id)
            .await?
            .iter()
            .map(|w| normalize(&w.word))
            .collect();

        let mut added = 0usize;
        for word in words {
            if !known.insert(word.key()) {
                continue;
            }
            self.store
                .add_word(user.id, NewWord::new(word.word, Some(word.translation)))
                .await?;
            added += 1;
        }
        tracing::info!(user_id = user.id, added, "📥 Generated word set added");

        let text = fill(t(user.language, Text::WordSetAdded), &[("count", added.to_string().as_str())]);
        Ok(Reply::new(text).with_keyboard(keyboards::main_menu(user.language)))
    }
}
