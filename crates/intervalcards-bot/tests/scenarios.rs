//! End-to-end conversation flows against the in-memory store, a scripted
//! completion provider and a recording transport.

use async_trait::async_trait;
use intervalcards_bot::i18n::{MenuButton, Text, t};
use intervalcards_bot::{ActionKey, Conversation, ConversationSettings, HandlerOutcome, ResponseStatus};
use intervalcards_core::config::{GeneratorConfig, SchedulerConfig};
use intervalcards_core::error::{IntervalCardsError, Result};
use intervalcards_core::traits::{CompletionParams, CompletionProvider, Outbound, Store};
use intervalcards_core::types::{
    Delivery, IncomingEvent, Keyboard, Language, NewWord, OutgoingMessage, UserRecord, UserStatus,
};
use intervalcards_scheduler::SchedulerRegistry;
use intervalcards_store::MemoryStore;
use intervalcards_wordsets::WordSetGenerator;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const USER: i64 = 7;
const CHAT: i64 = 700;

#[derive(Default)]
struct RecordingOutbound {
    sent: Mutex<Vec<OutgoingMessage>>,
}

impl RecordingOutbound {
    fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    fn last(&self) -> OutgoingMessage {
        self.sent.lock().unwrap().last().cloned().unwrap()
    }

    fn markdown_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.format.is_some())
            .map(|m| m.text.clone())
            .collect()
    }
}

#[async_trait]
impl Outbound for RecordingOutbound {
    async fn send(&self, message: OutgoingMessage) -> Result<Delivery> {
        let chat_id = message.chat_id;
        self.sent.lock().unwrap().push(message);
        Ok(Delivery { chat_id, message_id: Some(1) })
    }
}

#[derive(Default)]
struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<usize>,
}

impl ScriptedProvider {
    fn push_words(&self, words: &[&str]) {
        let items: Vec<_> = words
            .iter()
            .map(|w| serde_json::json!({ "word": w, "translation": format!("{w}-uk") }))
            .collect();
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(serde_json::Value::Array(items).to_string()));
    }

    fn push_error(&self, err: IntervalCardsError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str { "scripted" }

    async fn complete(&self, _system: &str, _user: &str, _params: &CompletionParams) -> Result<String> {
        *self.calls.lock().unwrap() += 1;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("[]".into()))
    }
}

struct Harness {
    store: Arc<MemoryStore>,
    outbound: Arc<RecordingOutbound>,
    provider: Arc<ScriptedProvider>,
    scheduler: Arc<SchedulerRegistry>,
    conversation: Conversation,
}

impl Harness {
    fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    fn with_store(store: Arc<MemoryStore>) -> Self {
        let outbound = Arc::new(RecordingOutbound::default());
        let provider = Arc::new(ScriptedProvider::default());
        let scheduler = Arc::new(SchedulerRegistry::new(
            store.clone(),
            outbound.clone(),
            SchedulerConfig { fast_mode: true, ..SchedulerConfig::default() },
        ));
        let generator = Arc::new(WordSetGenerator::new(
            provider.clone(),
            &GeneratorConfig::default(),
            CompletionParams::default(),
        ));
        let settings = ConversationSettings { words_per_set: 3, ..ConversationSettings::default() };
        let conversation = Conversation::new(
            store.clone(),
            outbound.clone(),
            scheduler.clone(),
            generator,
            settings,
        );
        Self { store, outbound, provider, scheduler, conversation }
    }

    async fn command(&self, payload: &str) -> HandlerOutcome {
        self.conversation.handle(IncomingEvent::command(USER, CHAT, payload)).await
    }

    async fn text(&self, payload: &str) -> HandlerOutcome {
        self.conversation.handle(IncomingEvent::text(USER, CHAT, payload)).await
    }

    async fn select(&self, token: &str) -> HandlerOutcome {
        self.conversation.handle(IncomingEvent::selection(USER, CHAT, token)).await
    }

    async fn menu(&self, button: MenuButton) -> HandlerOutcome {
        self.text(button.label(Language::En)).await
    }

    async fn user(&self) -> UserRecord {
        self.store.get_user(USER).await.unwrap().unwrap()
    }

    async fn words(&self) -> Vec<String> {
        self.store
            .list_words(USER)
            .await
            .unwrap()
            .into_iter()
            .map(|w| w.word)
            .collect()
    }

    async fn seed_words(&self, words: &[&str]) {
        for w in words {
            self.store.add_word(USER, NewWord::new(*w, None)).await.unwrap();
        }
    }
}

#[tokio::test]
async fn test_start_creates_user_and_welcomes() {
    let h = Harness::new();
    assert!(h.store.get_user(USER).await.unwrap().is_none());

    let outcome = h.command("/start").await;
    assert!(outcome.success);
    assert_eq!(outcome.next_status, UserStatus::Default);
    assert_eq!(outcome.message, t(Language::En, Text::Welcome));

    let user = h.user().await;
    assert_eq!(user.status, UserStatus::Default);
    assert_eq!(user.chat_id, CHAT);
    assert_eq!(h.outbound.count(), 1);
    assert_eq!(h.outbound.last().chat_id, CHAT);
}

#[tokio::test]
async fn test_language_hint_picks_interface_language() {
    let h = Harness::new();
    let mut event = IncomingEvent::command(USER, CHAT, "/start");
    event.language_hint = Some("uk-UA".into());
    let outcome = h.conversation.handle(event).await;

    assert_eq!(outcome.message, t(Language::Uk, Text::Welcome));
    assert_eq!(h.user().await.language, Language::Uk);
}

#[tokio::test]
async fn test_add_word_then_duplicate() {
    let h = Harness::new();
    h.command("/start").await;
    assert_eq!(h.menu(MenuButton::AddWord).await.next_status, UserStatus::AddWord);

    let outcome = h.text("cat / кіт").await;
    assert!(outcome.success);
    assert_eq!(outcome.next_status, UserStatus::AddWord);
    let stored = h.store.list_words(USER).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].word, "cat");
    assert_eq!(stored[0].translation.as_deref(), Some("кіт"));

    let outcome = h.text("cat / кіт").await;
    assert!(!outcome.success);
    assert_eq!(outcome.status, ResponseStatus::Duplicate);
    assert_eq!(outcome.next_status, UserStatus::AddWord);
    assert_eq!(h.words().await, vec!["cat"]);

    let outcome = h.menu(MenuButton::Finish).await;
    assert_eq!(outcome.next_status, UserStatus::Default);
}

#[tokio::test]
async fn test_empty_word_is_rejected() {
    let h = Harness::new();
    h.menu(MenuButton::AddWord).await;
    let outcome = h.text(" / кіт").await;
    assert_eq!(outcome.status, ResponseStatus::ValidationError);
    assert_eq!(outcome.message, t(Language::En, Text::ErrorValidation));
    assert!(h.words().await.is_empty());
}

#[tokio::test]
async fn test_set_interval_by_selection() {
    let h = Harness::new();
    let outcome = h.command("/set_interval").await;
    assert_eq!(outcome.next_status, UserStatus::SetInterval);
    assert!(matches!(h.outbound.last().keyboard, Some(Keyboard::Inline(_))));

    let outcome = h.select("3").await;
    assert!(outcome.success);
    assert_eq!(outcome.next_status, UserStatus::Default);
    let user = h.user().await;
    assert_eq!(user.interval_hours, 3);
    assert_eq!(user.status, UserStatus::Default);
}

#[tokio::test]
async fn test_invalid_interval_keeps_status() {
    let h = Harness::new();
    h.command("/set_interval").await;

    for token in ["13", "0", "two"] {
        let outcome = h.select(token).await;
        assert_eq!(outcome.status, ResponseStatus::ValidationError, "token {token}");
        assert_eq!(outcome.next_status, UserStatus::SetInterval);
    }
    let user = h.user().await;
    assert_eq!(user.interval_hours, 1);
    assert_eq!(user.status, UserStatus::SetInterval);
}

#[tokio::test]
async fn test_prefixed_token_wins_over_status() {
    let h = Harness::new();
    h.seed_words(&["cat"]).await;
    h.menu(MenuButton::RemoveWord).await;
    assert_eq!(h.user().await.status, UserStatus::RemoveWord);

    let outcome = h.select("lang:uk").await;
    assert!(outcome.success);
    assert_eq!(outcome.message, t(Language::Uk, Text::LanguageSet));
    let user = h.user().await;
    assert_eq!(user.language, Language::Uk);
    assert_eq!(user.status, UserStatus::Default);
    assert_eq!(h.words().await, vec!["cat"]);
}

#[tokio::test]
async fn test_learning_language_and_categories() {
    let h = Harness::new();
    h.command("/learning_language").await;
    let outcome = h.select("learn:de").await;
    assert!(outcome.success);
    assert_eq!(h.user().await.learning_language, Language::De);

    h.command("/set_favorite_categories").await;
    h.select("cat:0").await;
    let outcome = h.select("cat:1").await;
    assert_eq!(outcome.next_status, UserStatus::FavoriteCategories);
    let user = h.user().await;
    assert!(user.favorite_categories.contains("Animals"));
    assert!(user.favorite_categories.contains("Food"));

    h.select("cat:0").await;
    assert!(!h.user().await.favorite_categories.contains("Animals"));

    let outcome = h.select("cat:99").await;
    assert_eq!(outcome.status, ResponseStatus::ValidationError);
}

#[tokio::test]
async fn test_remove_word_flow() {
    let h = Harness::new();
    h.seed_words(&["cat", "dog"]).await;
    let stored = h.store.list_words(USER).await.unwrap();

    let outcome = h.menu(MenuButton::RemoveWord).await;
    assert_eq!(outcome.next_status, UserStatus::RemoveWord);

    let outcome = h.select(&stored[0].id).await;
    assert!(outcome.success);
    assert_eq!(outcome.next_status, UserStatus::RemoveWord);
    assert_eq!(h.words().await, vec!["dog"]);

    let outcome = h.select(&stored[0].id).await;
    assert_eq!(outcome.status, ResponseStatus::NotFound);
    assert_eq!(outcome.next_status, UserStatus::RemoveWord);

    let outcome = h.select(&stored[1].id).await;
    assert!(outcome.success);
    assert_eq!(outcome.next_status, UserStatus::Default);
    assert!(h.words().await.is_empty());
}

#[tokio::test]
async fn test_remove_word_with_empty_dictionary() {
    let h = Harness::new();
    let outcome = h.menu(MenuButton::RemoveWord).await;
    assert!(outcome.success);
    assert_eq!(outcome.message, t(Language::En, Text::NoWords));
    assert_eq!(outcome.next_status, UserStatus::Default);
}

#[tokio::test]
async fn test_show_all_lists_dictionary() {
    let h = Harness::new();
    h.seed_words(&["cat"]).await;
    let outcome = h.menu(MenuButton::ShowAll).await;
    assert!(outcome.message.contains("1. cat"));
    assert_eq!(outcome.next_status, UserStatus::Default);
}

#[tokio::test]
async fn test_generated_set_accepted() {
    let h = Harness::new();
    h.seed_words(&["cat"]).await;
    h.command("/set_favorite_categories").await;
    h.select("cat:0").await;

    h.provider.push_words(&["dog", "fox", "owl", "bee"]);
    let outcome = h.command("/add_words_set").await;
    assert!(outcome.success, "{outcome:?}");
    assert_eq!(outcome.next_status, UserStatus::ConfirmAction);
    assert!(outcome.message.contains("dog"));
    assert_eq!(h.conversation.pending_count(), 1);
    assert_eq!(h.provider.calls(), 1);

    let outcome = h.select(&ActionKey::BulkAddGeneratedSet.token(true)).await;
    assert!(outcome.success);
    assert_eq!(outcome.next_status, UserStatus::Default);
    assert_eq!(h.words().await, vec!["cat", "dog", "fox", "owl"]);
    assert_eq!(h.conversation.pending_count(), 0);
}

#[tokio::test]
async fn test_generated_set_declined() {
    let h = Harness::new();
    h.command("/set_favorite_categories").await;
    h.select("cat:0").await;
    h.provider.push_words(&["dog", "fox", "owl"]);
    h.command("/add_words_set").await;

    let outcome = h.select(&ActionKey::BulkAddGeneratedSet.token(false)).await;
    assert!(outcome.success);
    assert_eq!(outcome.message, t(Language::En, Text::ActionCancelled));
    assert_eq!(outcome.next_status, UserStatus::Default);
    assert!(h.words().await.is_empty());
    assert_eq!(h.conversation.pending_count(), 0);
}

#[tokio::test]
async fn test_leaving_confirmation_drops_pending_set() {
    let h = Harness::new();
    h.command("/set_favorite_categories").await;
    h.select("cat:0").await;
    h.provider.push_words(&["dog", "fox", "owl"]);
    h.command("/add_words_set").await;
    assert_eq!(h.conversation.pending_count(), 1);

    h.command("/start").await;
    assert_eq!(h.conversation.pending_count(), 0);

    let outcome = h.select(&ActionKey::BulkAddGeneratedSet.token(true)).await;
    assert_eq!(outcome.status, ResponseStatus::NotFound);
    assert_eq!(outcome.next_status, UserStatus::Default);
    assert!(h.words().await.is_empty());
}

#[tokio::test]
async fn test_generated_set_requires_categories() {
    let h = Harness::new();
    let outcome = h.command("/add_words_set").await;
    assert!(outcome.success);
    assert_eq!(outcome.message, t(Language::En, Text::NeedFavoriteCategories));
    assert_eq!(h.provider.calls(), 0);
}

#[tokio::test]
async fn test_generation_failures_are_reported() {
    let h = Harness::new();
    h.command("/set_favorite_categories").await;
    h.select("cat:0").await;
    h.menu(MenuButton::Finish).await;

    let outcome = h.command("/add_words_set").await;
    assert_eq!(outcome.status, ResponseStatus::GenerationExhausted);
    assert_eq!(outcome.next_status, UserStatus::Default);
    assert_eq!(h.provider.calls(), 3);

    h.provider.push_error(IntervalCardsError::RateLimited("slow down".into()));
    let outcome = h.command("/add_words_set").await;
    assert_eq!(outcome.status, ResponseStatus::UpstreamError);
    assert_eq!(outcome.message, t(Language::En, Text::ErrorGeneric));
    assert_eq!(h.conversation.pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_generation_keeps_learning_session() {
    let h = Harness::new();
    h.seed_words(&["cat"]).await;
    h.command("/set_favorite_categories").await;
    h.select("cat:0").await;
    h.menu(MenuButton::StartLearn).await;
    assert!(h.scheduler.has_job(USER));

    h.provider.push_error(IntervalCardsError::Unavailable("502".into()));
    let outcome = h.command("/add_words_set").await;
    assert_eq!(outcome.status, ResponseStatus::UpstreamError);
    assert_eq!(outcome.next_status, UserStatus::StartLearn);
    assert_eq!(h.user().await.status, UserStatus::StartLearn);
    assert!(h.scheduler.has_job(USER));
}

#[tokio::test]
async fn test_unknown_command_is_not_stored_as_word() {
    let h = Harness::new();
    h.menu(MenuButton::AddWord).await;

    let outcome = h.command("/foo").await;
    assert_eq!(outcome.status, ResponseStatus::ValidationError);
    assert_eq!(outcome.next_status, UserStatus::AddWord);

    let outcome = h.text("/bar / baz").await;
    assert_eq!(outcome.status, ResponseStatus::ValidationError);
    assert!(h.words().await.is_empty());
}

#[tokio::test]
async fn test_text_outside_input_statuses() {
    let h = Harness::new();
    let outcome = h.text("hello").await;
    assert!(outcome.success);
    assert_eq!(outcome.message, t(Language::En, Text::Welcome));

    h.seed_words(&["cat"]).await;
    h.menu(MenuButton::RemoveWord).await;
    let outcome = h.text("cat").await;
    assert_eq!(outcome.status, ResponseStatus::ValidationError);
    assert_eq!(h.words().await, vec!["cat"]);
}

#[tokio::test]
async fn test_exactly_one_reply_per_event() {
    let h = Harness::new();
    h.command("/start").await;
    h.menu(MenuButton::AddWord).await;
    h.text("cat").await;
    h.text("cat").await;
    h.command("/my_status").await;
    h.select("lang:xx").await;
    assert_eq!(h.outbound.count(), 6);
}

#[tokio::test(start_paused = true)]
async fn test_start_and_stop_learning() {
    let h = Harness::new();
    h.seed_words(&["cat"]).await;

    let outcome = h.menu(MenuButton::StartLearn).await;
    assert!(outcome.success);
    assert_eq!(outcome.next_status, UserStatus::StartLearn);
    assert!(h.scheduler.has_job(USER));

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(h.outbound.markdown_texts(), vec!["*cat*"]);

    let outcome = h.text("anything").await;
    assert_eq!(outcome.message, t(Language::En, Text::InLearningMode));
    assert!(h.scheduler.has_job(USER));

    let outcome = h.menu(MenuButton::StopLearn).await;
    assert_eq!(outcome.next_status, UserStatus::Default);
    assert!(!h.scheduler.has_job(USER));

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(h.outbound.markdown_texts().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_command_during_learning_stops_session() {
    let h = Harness::new();
    h.seed_words(&["cat"]).await;
    h.menu(MenuButton::StartLearn).await;
    assert!(h.scheduler.has_job(USER));

    h.command("/set_interval").await;
    assert!(!h.scheduler.has_job(USER));
    assert_eq!(h.user().await.status, UserStatus::SetInterval);
}

#[tokio::test]
async fn test_start_learning_with_empty_dictionary() {
    let h = Harness::new();
    let outcome = h.menu(MenuButton::StartLearn).await;
    assert!(outcome.success);
    assert_eq!(outcome.message, t(Language::En, Text::NoWords));
    assert_eq!(outcome.next_status, UserStatus::Default);
    assert!(!h.scheduler.has_job(USER));
}

#[tokio::test(start_paused = true)]
async fn test_sessions_survive_restart() {
    let store = Arc::new(MemoryStore::new());
    {
        let h = Harness::with_store(store.clone());
        h.seed_words(&["dog", "cat"]).await;
        h.command("/set_interval").await;
        h.select("2").await;
        h.menu(MenuButton::StartLearn).await;
        assert!(h.scheduler.has_job(USER));
        h.scheduler.stop_all();
    }

    let h = Harness::with_store(store);
    assert_eq!(h.user().await.status, UserStatus::StartLearn);
    assert_eq!(h.scheduler.resume_all().await.unwrap(), 1);
    assert_eq!(h.scheduler.job_count(), 1);
    assert_eq!(h.scheduler.job_info(USER).unwrap().interval_hours, 2);

    tokio::time::sleep(Duration::from_secs(6)).await;
    let sent = h.outbound.markdown_texts();
    assert_eq!(sent.len(), 1);
    assert!(sent[0] == "*dog*" || sent[0] == "*cat*");
}
