//! Event handlers. Each mutates the user record in place and returns the reply;
//! persistence and session bookkeeping happen in `Conversation::commit`.

mod learning;
mod settings;
mod wordset;
mod words;

use intervalcards_core::error::{IntervalCardsError, Result};
use intervalcards_core::types::{Keyboard, UserRecord, UserStatus};

use crate::action::{Command, category_index, interface_language, learning_language};
use crate::conversation::Conversation;
use crate::i18n::{MenuButton, Text, fill, t};
use crate::keyboards;

/// Primary reply to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), keyboard: None }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

impl Conversation {
    /// Reply keyboard matching the user's status.
    pub(crate) fn menu_for(&self, user: &UserRecord) -> Keyboard {
        match user.status {
            UserStatus::StartLearn => keyboards::learning_menu(user.language),
            UserStatus::AddWord => keyboards::adding_menu(user.language),
            UserStatus::RemoveWord => keyboards::removing_menu(user.language),
            _ => keyboards::main_menu(user.language),
        }
    }

    pub(crate) async fn on_command(&self, user: &mut UserRecord, command: Command) -> Result<Reply> {
        match command {
            Command::Start => Ok(self.start(user)),
            Command::Instruction => Ok(self.instruction(user)),
            Command::SetInterval => Ok(self.enter_set_interval(user)),
            Command::SetFavoriteCategories => Ok(self.enter_categories(user)),
            Command::MyStatus => self.my_status(user).await,
            Command::Language => Ok(self.enter_language(user)),
            Command::LearningLanguage => Ok(self.enter_learning_language(user)),
            Command::AddWordsSet => self.add_words_set(user).await,
        }
    }

    pub(crate) async fn on_menu(&self, user: &mut UserRecord, button: MenuButton) -> Result<Reply> {
        match button {
            MenuButton::ShowAll => self.show_all(user).await,
            MenuButton::AddWord => Ok(self.enter_add_word(user)),
            MenuButton::RemoveWord => self.enter_remove_word(user).await,
            MenuButton::StartLearn => self.start_learning(user).await,
            MenuButton::StopLearn => Ok(self.stop_learning(user)),
            MenuButton::Finish | MenuButton::Cancel => Ok(self.home(user)),
        }
    }

    /// Free text, read according to the current status.
    pub(crate) async fn on_text(&self, user: &mut UserRecord, text: &str) -> Result<Reply> {
        match user.status {
            UserStatus::AddWord => self.add_word(user, text).await,
            UserStatus::SetInterval => self.set_interval(user, text),
            UserStatus::SetLanguage => interface_language(text).map(|l| self.set_language(user, l)),
            UserStatus::SetLearningLanguage => learning_language(text).map(|l| self.set_learning_language(user, l)),
            UserStatus::FavoriteCategories => category_index(text).and_then(|i| self.toggle_category(user, i)),
            UserStatus::StartLearn => Ok(Reply::new(t(user.language, Text::InLearningMode))
                .with_keyboard(keyboards::learning_menu(user.language))),
            UserStatus::RemoveWord | UserStatus::ConfirmAction => Err(IntervalCardsError::validation(format!(
                "Expected a button press in status {}",
                user.status
            ))),
            UserStatus::Default => Ok(self.start(user)),
        }
    }

    /// Unprefixed selection token, read according to the current status.
    pub(crate) async fn on_selection(&self, user: &mut UserRecord, token: &str) -> Result<Reply> {
        match user.status {
            UserStatus::RemoveWord => self.remove_word(user, token).await,
            UserStatus::SetInterval => self.set_interval(user, token),
            UserStatus::SetLanguage => interface_language(token).map(|l| self.set_language(user, l)),
            UserStatus::SetLearningLanguage => learning_language(token).map(|l| self.set_learning_language(user, l)),
            UserStatus::FavoriteCategories => category_index(token).and_then(|i| self.toggle_category(user, i)),
            status => Err(IntervalCardsError::validation(format!(
                "Unexpected selection '{token}' in status {status}"
            ))),
        }
    }

    pub(crate) fn start(&self, user: &mut UserRecord) -> Reply {
        user.status = UserStatus::Default;
        Reply::new(t(user.language, Text::Welcome)).with_keyboard(keyboards::main_menu(user.language))
    }

    pub(crate) fn home(&self, user: &mut UserRecord) -> Reply {
        user.status = UserStatus::Default;
        Reply::new(t(user.language, Text::Home)).with_keyboard(keyboards::main_menu(user.language))
    }

    /// Instructions; the status is left as it is.
    pub(crate) fn instruction(&self, user: &UserRecord) -> Reply {
        let text = fill(
            t(user.language, Text::Instruction),
            &[
                ("interval", user.interval_hours.to_string().as_str()),
                ("start", self.settings.window_start_hour.to_string().as_str()),
                ("end", self.settings.window_end_hour.to_string().as_str()),
            ],
        );
        Reply::new(text).with_keyboard(self.menu_for(user))
    }
}
