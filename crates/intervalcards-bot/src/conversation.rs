//! Conversation engine: one `handle` call per inbound event.

use intervalcards_core::config::IntervalCardsConfig;
use intervalcards_core::error::{ErrorKind, IntervalCardsError, Result};
use intervalcards_core::traits::{Outbound, Store};
use intervalcards_core::types::{ChatId, IncomingEvent, Language, OutgoingMessage, UserId, UserRecord, UserStatus};
use intervalcards_scheduler::SchedulerRegistry;
use intervalcards_wordsets::{GeneratedWord, WordSetGenerator};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::action::Action;
use crate::handlers::Reply;
use crate::i18n::{Text, t};
use crate::outcome::{HandlerOutcome, ResponseStatus};

/// Values shown to users or used by handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSettings {
    pub words_per_set: usize,
    pub window_start_hour: u32,
    pub window_end_hour: u32,
}

impl From<&IntervalCardsConfig> for ConversationSettings {
    fn from(config: &IntervalCardsConfig) -> Self {
        Self {
            words_per_set: config.generator.words_per_set,
            window_start_hour: config.scheduler.window_start_hour,
            window_end_hour: config.scheduler.window_end_hour,
        }
    }
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self::from(&IntervalCardsConfig::default())
    }
}

pub struct Conversation {
    pub(crate) store: Arc<dyn Store>,
    pub(crate) outbound: Arc<dyn Outbound>,
    pub(crate) scheduler: Arc<SchedulerRegistry>,
    pub(crate) generator: Arc<WordSetGenerator>,
    pub(crate) settings: ConversationSettings,
    /// Generated sets awaiting confirmation, per user.
    pending: Mutex<HashMap<UserId, Vec<GeneratedWord>>>,
}

impl Conversation {
    pub fn new(
        store: Arc<dyn Store>,
        outbound: Arc<dyn Outbound>,
        scheduler: Arc<SchedulerRegistry>,
        generator: Arc<WordSetGenerator>,
        settings: ConversationSettings,
    ) -> Self {
        Self {
            store,
            outbound,
            scheduler,
            generator,
            settings,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Handle one event. Never fails: errors become a localized reply and a
    /// non-success outcome.
    pub async fn handle(&self, event: IncomingEvent) -> HandlerOutcome {
        let mut user = match self.load_user(&event).await {
            Ok(user) => user,
            Err(e) => {
                tracing::error!(user_id = event.user_id, "❌ Cannot load user: {e}");
                let lang = Language::detect(event.language_hint.as_deref());
                return self.respond(event.chat_id, lang, UserStatus::Default, Err(e)).await;
            }
        };

        let before = user.clone();
        let result = match Action::decode(&event) {
            Ok(action) => {
                tracing::debug!(user_id = user.id, status = %user.status, ?action, "Dispatching");
                self.dispatch(&mut user, action).await
            }
            Err(e) => Err(e),
        };

        let (result, next_status) = self.commit(&before, &user, result).await;
        self.respond(user.chat_id, user.language, next_status, result).await
    }

    /// Fetch the user's record, creating it on first contact.
    async fn load_user(&self, event: &IncomingEvent) -> Result<UserRecord> {
        match self.store.get_user(event.user_id).await? {
            Some(mut user) => {
                if user.chat_id != event.chat_id {
                    user.chat_id = event.chat_id;
                    self.store.upsert_user(&user).await?;
                }
                Ok(user)
            }
            None => {
                let language = Language::detect(event.language_hint.as_deref());
                let user = UserRecord::new(event.user_id, event.chat_id, language);
                self.store.upsert_user(&user).await?;
                tracing::info!(user_id = user.id, language = language.code(), "👤 New user");
                Ok(user)
            }
        }
    }

    async fn dispatch(&self, user: &mut UserRecord, action: Action) -> Result<Reply> {
        match action {
            Action::Command(command) => self.on_command(user, command).await,
            Action::Menu(button) => self.on_menu(user, button).await,
            Action::SetLanguage(language) => Ok(self.set_language(user, language)),
            Action::SetLearningLanguage(language) => Ok(self.set_learning_language(user, language)),
            Action::ToggleCategory(index) => self.toggle_category(user, index),
            Action::Confirm { accepted, key } => self.confirm(user, accepted, key).await,
            Action::Text(text) => self.on_text(user, &text).await,
            Action::Selection(token) => self.on_selection(user, &token).await,
        }
    }

    /// Apply side effects of the status change and persist the record.
    /// Returns the result to report and the status that is now stored.
    async fn commit(
        &self,
        before: &UserRecord,
        user: &UserRecord,
        result: Result<Reply>,
    ) -> (Result<Reply>, UserStatus) {
        let left_learning = before.status == UserStatus::StartLearn && user.status != UserStatus::StartLearn;
        if left_learning {
            self.scheduler.stop_session(user.id);
        }
        if before.status == UserStatus::ConfirmAction && user.status != UserStatus::ConfirmAction {
            self.take_pending(user.id);
        }

        if user == before {
            return (result, user.status);
        }

        match self.store.upsert_user(user).await {
            Ok(()) => {
                if before.status != user.status {
                    tracing::debug!(user_id = user.id, from = %before.status, to = %user.status, "Status changed");
                }
                (result, user.status)
            }
            Err(e) => {
                tracing::error!(user_id = user.id, "❌ Cannot persist user: {e}");
                if user.status == UserStatus::StartLearn && before.status != UserStatus::StartLearn {
                    self.scheduler.stop_session(user.id);
                }
                (result.and(Err(e)), before.status)
            }
        }
    }

    /// Send the single primary reply and build the outcome.
    async fn respond(
        &self,
        chat_id: ChatId,
        language: Language,
        next_status: UserStatus,
        result: Result<Reply>,
    ) -> HandlerOutcome {
        let (outcome, reply) = match result {
            Ok(reply) => (HandlerOutcome::ok(next_status, reply.text.clone()), reply),
            Err(e) => {
                let status = ResponseStatus::from(&e);
                log_failure(&e);
                let text = t(language, error_text(e.kind()));
                (HandlerOutcome::failed(status, next_status, text), Reply::new(text))
            }
        };

        let mut message = OutgoingMessage::text(chat_id, reply.text);
        if let Some(keyboard) = reply.keyboard {
            message = message.with_keyboard(keyboard);
        }
        if let Err(e) = self.outbound.send(message).await {
            tracing::error!(chat_id, "❌ Reply delivery failed: {e}");
        }
        outcome
    }

    pub(crate) fn store_pending(&self, user_id: UserId, words: Vec<GeneratedWord>) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.insert(user_id, words);
        }
    }

    pub(crate) fn take_pending(&self, user_id: UserId) -> Option<Vec<GeneratedWord>> {
        self.pending.lock().ok()?.remove(&user_id)
    }

    /// Number of users with a generated set awaiting confirmation.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }
}

fn error_text(kind: ErrorKind) -> Text {
    match kind {
        ErrorKind::Validation => Text::ErrorValidation,
        ErrorKind::NotFound => Text::ErrorNotFound,
        ErrorKind::Duplicate => Text::ErrorDuplicate,
        ErrorKind::Upstream | ErrorKind::GenerationExhausted => Text::ErrorGeneric,
    }
}

fn log_failure(err: &IntervalCardsError) {
    if err.is_upstream() || matches!(err, IntervalCardsError::GenerationExhausted { .. }) {
        tracing::warn!("⚠️ Handler failed: {err}");
    } else {
        tracing::debug!("Rejected input: {err}");
    }
}
