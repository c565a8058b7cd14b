//! Interval, language and category settings, plus the status report.

use intervalcards_core::error::{IntervalCardsError, Result};
use intervalcards_core::types::{Language, UserRecord, UserStatus, parse_interval};

use super::Reply;
use crate::categories::category;
use crate::conversation::Conversation;
use crate::i18n::{Text, fill, t};
use crate::keyboards;

fn category_list(user: &UserRecord) -> String {
    if user.favorite_categories.is_empty() {
        return t(user.language, Text::None).to_string();
    }
    user.favorite_categories.iter().cloned().collect::<Vec<_>>().join(", ")
}

impl Conversation {
    pub(crate) fn enter_set_interval(&self, user: &mut UserRecord) -> Reply {
        user.status = UserStatus::SetInterval;
        Reply::new(t(user.language, Text::ChooseInterval)).with_keyboard(keyboards::intervals(user.language))
    }

    /// Persist a valid interval and return to `default`. Invalid input leaves the status unchanged.
    pub(crate) fn set_interval(&self, user: &mut UserRecord, token: &str) -> Result<Reply> {
        let hours = parse_interval(token)?;
        user.interval_hours = hours;
        user.status = UserStatus::Default;
        tracing::info!(user_id = user.id, hours, "⏱️ Interval set");

        let text = fill(t(user.language, Text::IntervalSet), &[("interval", hours.to_string().as_str())]);
        Ok(Reply::new(text).with_keyboard(keyboards::main_menu(user.language)))
    }

    pub(crate) fn enter_language(&self, user: &mut UserRecord) -> Reply {
        user.status = UserStatus::SetLanguage;
        Reply::new(t(user.language, Text::ChooseLanguage)).with_keyboard(keyboards::interface_languages())
    }

    pub(crate) fn set_language(&self, user: &mut UserRecord, language: Language) -> Reply {
        user.language = language;
        user.status = UserStatus::Default;
        Reply::new(t(language, Text::LanguageSet)).with_keyboard(keyboards::main_menu(language))
    }

    pub(crate) fn enter_learning_language(&self, user: &mut UserRecord) -> Reply {
        user.status = UserStatus::SetLearningLanguage;
        Reply::new(t(user.language, Text::ChooseLearningLanguage)).with_keyboard(keyboards::learning_languages())
    }

    pub(crate) fn set_learning_language(&self, user: &mut UserRecord, language: Language) -> Reply {
        user.learning_language = language;
        user.status = UserStatus::Default;
        let text = fill(t(user.language, Text::LearningLanguageSet), &[("language", language.native_label())]);
        Reply::new(text).with_keyboard(keyboards::main_menu(user.language))
    }

    pub(crate) fn enter_categories(&self, user: &mut UserRecord) -> Reply {
        user.status = UserStatus::FavoriteCategories;
        Reply::new(t(user.language, Text::ChooseCategories)).with_keyboard(keyboards::categories(user))
    }

    /// Toggle one category; the user stays in `favorite_categories` for multi-select.
    pub(crate) fn toggle_category(&self, user: &mut UserRecord, index: usize) -> Result<Reply> {
        let name = category(index)
            .ok_or_else(|| IntervalCardsError::validation(format!("Unknown category index {index}")))?;
        let selected = user.toggle_category(name);
        user.status = UserStatus::FavoriteCategories;
        tracing::debug!(user_id = user.id, category = name, selected, "Category toggled");

        let text = if user.favorite_categories.is_empty() {
            t(user.language, Text::NoCategoriesSelected).to_string()
        } else {
            fill(t(user.language, Text::CategoriesSelected), &[("categories", category_list(user).as_str())])
        };
        Ok(Reply::new(text).with_keyboard(keyboards::categories(user)))
    }

    pub(crate) async fn my_status(&self, user: &UserRecord) -> Result<Reply> {
        let count = self.store.list_words(user.id).await?.len();
        let text = fill(
            t(user.language, Text::StatusReport),
            &[
                ("status", user.status.as_str()),
                ("interval", user.interval_hours.to_string().as_str()),
                ("language", user.language.native_label()),
                ("learning", user.learning_language.native_label()),
                ("categories", category_list(user).as_str()),
                ("count", count.to_string().as_str()),
            ],
        );
        Ok(Reply::new(text).with_keyboard(self.menu_for(user)))
    }
}
