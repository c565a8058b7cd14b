//! Start and stop learning sessions.

use intervalcards_core::error::Result;
use intervalcards_core::types::{UserRecord, UserStatus};

use super::Reply;
use crate::conversation::Conversation;
use crate::i18n::{Text, fill, t};
use crate::keyboards;

impl Conversation {
    /// Start (or restart) the user's session. Refused while the dictionary is empty.
    pub(crate) async fn start_learning(&self, user: &mut UserRecord) -> Result<Reply> {
        let words = self.store.list_words(user.id).await?;
        if words.is_empty() {
            user.status = UserStatus::Default;
            return Ok(Reply::new(t(user.language, Text::NoWords))
                .with_keyboard(keyboards::main_menu(user.language)));
        }

        self.scheduler.start_session(user.id, user.chat_id, user.interval_hours)?;
        user.status = UserStatus::StartLearn;

        let text = fill(
            t(user.language, Text::LearningStarted),
            &[
                ("interval", user.interval_hours.to_string().as_str()),
                ("start", self.settings.window_start_hour.to_string().as_str()),
                ("end", self.settings.window_end_hour.to_string().as_str()),
            ],
        );
        Ok(Reply::new(text).with_keyboard(keyboards::learning_menu(user.language)))
    }

    pub(crate) fn stop_learning(&self, user: &mut UserRecord) -> Reply {
        self.scheduler.stop_session(user.id);
        user.status = UserStatus::Default;
        Reply::new(t(user.language, Text::LearningStopped)).with_keyboard(keyboards::main_menu(user.language))
    }
}
