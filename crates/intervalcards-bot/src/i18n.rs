//! Localized interface strings (English and Ukrainian).
//!
//! Templates use `{name}` placeholders filled with [`fill`].

use intervalcards_core::types::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    Welcome,
    Instruction,
    Home,
    InLearningMode,
    AddWordPrompt,
    WordAdded,
    ChooseWordToRemove,
    WordRemoved,
    NoWords,
    DictionaryHeader,
    LearningStarted,
    LearningStopped,
    ChooseInterval,
    IntervalSet,
    ChooseLanguage,
    LanguageSet,
    ChooseLearningLanguage,
    LearningLanguageSet,
    ChooseCategories,
    CategoriesSelected,
    NoCategoriesSelected,
    NeedFavoriteCategories,
    WordSetProposal,
    WordSetAdded,
    ActionCancelled,
    StatusReport,
    None,
    Yes,
    No,
    EveryHour,
    EveryNHours,
    ErrorValidation,
    ErrorNotFound,
    ErrorDuplicate,
    ErrorGeneric,
}

/// Interface language used for lookups; anything but Ukrainian falls back to English.
fn interface(lang: Language) -> Language {
    if lang == Language::Uk { Language::Uk } else { Language::En }
}

pub fn t(lang: Language, text: Text) -> &'static str {
    let uk = interface(lang) == Language::Uk;
    let pick = |en: &'static str, ua: &'static str| if uk { ua } else { en };

    match text {
        Text::Welcome => pick(
            "Welcome to IntervalCards! 👋\nAdd words you want to learn and I will send you a random one from your list periodically.\nUse /instruction for more information.",
            "Вітаю в IntervalCards! 👋\nДодавайте слова, які хочете вивчити, і я періодично надсилатиму вам випадкове слово з вашого списку.\nБільше інформації: /instruction.",
        ),
        Text::Instruction => pick(
            "This bot helps you learn words:\n1. Add several words you want to learn (\"➕ Add word\").\n2. Press \"▶️ Start learning\" to start.\n\n⦿ Every {interval}h you will get one word from your list while learning.\n⦿ Words are sent from {start}:00 to {end}:00.\n⦿ To stop, press \"⏹ Stop learning\".\n⦿ /set_interval changes how often words arrive.\n⦿ /set_favorite_categories and /add_words_set add AI-generated word sets.",
            "Цей бот допомагає вчити слова:\n1. Додайте кілька слів (\"➕ Додати слово\").\n2. Натисніть \"▶️ Почати навчання\".\n\n⦿ Кожні {interval} год ви отримуватимете одне слово зі свого списку.\n⦿ Слова надсилаються з {start}:00 до {end}:00.\n⦿ Щоб зупинитися, натисніть \"⏹ Зупинити навчання\".\n⦿ /set_interval змінює частоту повідомлень.\n⦿ /set_favorite_categories та /add_words_set додають згенеровані набори слів.",
        ),
        Text::Home => pick("🏠 Main menu. Choose an action.", "🏠 Головне меню. Оберіть дію."),
        Text::InLearningMode => pick(
            "You are in learning mode. Use the keyboard menu to navigate.",
            "Ви в режимі навчання. Використовуйте меню клавіатури.",
        ),
        Text::AddWordPrompt => pick(
            "Send a word in the format:\nword / translation / comment / example\nOnly the word is required. Send as many as you like, then press \"✅ Finish\".",
            "Надішліть слово у форматі:\nслово / переклад / коментар / приклад\nОбов'язкове лише слово. Надсилайте скільки завгодно, потім натисніть \"✅ Готово\".",
        ),
        Text::WordAdded => pick("✅ \"{word}\" added.", "✅ \"{word}\" додано."),
        Text::ChooseWordToRemove => pick("Choose a word to remove:", "Оберіть слово для видалення:"),
        Text::WordRemoved => pick("🗑 Word removed.", "🗑 Слово видалено."),
        Text::NoWords => pick(
            "You have no words yet. Add some first.",
            "У вас ще немає слів. Спочатку додайте їх.",
        ),
        Text::DictionaryHeader => pick("📚 Your words ({count}):", "📚 Ваші слова ({count}):"),
        Text::LearningStarted => pick(
            "▶️ Learning started. Every {interval}h you will get one word from {start}:00 to {end}:00.",
            "▶️ Навчання розпочато. Кожні {interval} год ви отримуватимете одне слово з {start}:00 до {end}:00.",
        ),
        Text::LearningStopped => pick("⏹ Learning stopped.", "⏹ Навчання зупинено."),
        Text::ChooseInterval => pick(
            "How often should I send you a word?",
            "Як часто надсилати вам слово?",
        ),
        Text::IntervalSet => pick("⏱ Interval set: every {interval}h.", "⏱ Інтервал: кожні {interval} год."),
        Text::ChooseLanguage => pick("Choose the interface language:", "Оберіть мову інтерфейсу:"),
        Text::LanguageSet => pick("🌐 Interface language: English.", "🌐 Мова інтерфейсу: українська."),
        Text::ChooseLearningLanguage => pick(
            "Which language are you learning?",
            "Яку мову ви вивчаєте?",
        ),
        Text::LearningLanguageSet => pick("🎓 Learning language: {language}.", "🎓 Мова навчання: {language}."),
        Text::ChooseCategories => pick(
            "Choose your favorite categories (tap again to unselect):",
            "Оберіть улюблені категорії (повторне натискання скасовує вибір):",
        ),
        Text::CategoriesSelected => pick("Selected categories: {categories}", "Обрані категорії: {categories}"),
        Text::NoCategoriesSelected => pick("No categories selected.", "Категорії не обрано."),
        Text::NeedFavoriteCategories => pick(
            "Choose favorite categories first: /set_favorite_categories",
            "Спочатку оберіть улюблені категорії: /set_favorite_categories",
        ),
        Text::WordSetProposal => pick(
            "✨ Generated words:\n{words}\n\nAdd them to your dictionary?",
            "✨ Згенеровані слова:\n{words}\n\nДодати їх до словника?",
        ),
        Text::WordSetAdded => pick("✅ Added {count} word(s).", "✅ Додано слів: {count}."),
        Text::ActionCancelled => pick("Cancelled.", "Скасовано."),
        Text::StatusReport => pick(
            "📊 Status: {status}\n⏱ Interval: every {interval}h\n🌐 Interface: {language}\n🎓 Learning: {learning}\n⭐ Categories: {categories}\n📚 Words: {count}",
            "📊 Статус: {status}\n⏱ Інтервал: кожні {interval} год\n🌐 Інтерфейс: {language}\n🎓 Навчання: {learning}\n⭐ Категорії: {categories}\n📚 Слів: {count}",
        ),
        Text::None => pick("none", "немає"),
        Text::Yes => pick("✅ Yes", "✅ Так"),
        Text::No => pick("❌ No", "❌ Ні"),
        Text::EveryHour => pick("Every hour", "Щогодини"),
        Text::EveryNHours => pick("Every {n} hours", "Кожні {n} год"),
        Text::ErrorValidation => pick(
            "That doesn't look right. Please check the input and try again.",
            "Щось не так із введенням. Перевірте та спробуйте ще раз.",
        ),
        Text::ErrorNotFound => pick("Nothing found. Please try again.", "Нічого не знайдено. Спробуйте ще раз."),
        Text::ErrorDuplicate => pick(
            "This word is already in your dictionary.",
            "Це слово вже є у вашому словнику.",
        ),
        Text::ErrorGeneric => pick(
            "Something went wrong. Please try again.",
            "Щось пішло не так. Спробуйте ще раз.",
        ),
    }
}

/// Substitute `{key}` placeholders.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}

/// Reply-keyboard buttons. Pressing one sends its label as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuButton {
    ShowAll,
    AddWord,
    RemoveWord,
    StartLearn,
    StopLearn,
    Finish,
    Cancel,
}

impl MenuButton {
    pub const ALL: [MenuButton; 7] = [
        MenuButton::ShowAll,
        MenuButton::AddWord,
        MenuButton::RemoveWord,
        MenuButton::StartLearn,
        MenuButton::StopLearn,
        MenuButton::Finish,
        MenuButton::Cancel,
    ];

    pub fn label(self, lang: Language) -> &'static str {
        let uk = interface(lang) == Language::Uk;
        let pick = |en: &'static str, ua: &'static str| if uk { ua } else { en };
        match self {
            Self::ShowAll => pick("📚 Show all", "📚 Показати всі"),
            Self::AddWord => pick("➕ Add word", "➕ Додати слово"),
            Self::RemoveWord => pick("➖ Remove word", "➖ Видалити слово"),
            Self::StartLearn => pick("▶️ Start learning", "▶️ Почати навчання"),
            Self::StopLearn => pick("⏹ Stop learning", "⏹ Зупинити навчання"),
            Self::Finish => pick("✅ Finish", "✅ Готово"),
            Self::Cancel => pick("❌ Cancel", "❌ Скасувати"),
        }
    }

    /// Match a label in any interface language.
    pub fn from_label(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL.into_iter().find(|button| {
            Language::INTERFACE
                .iter()
                .any(|lang| button.label(*lang) == text)
        })
    }
}
