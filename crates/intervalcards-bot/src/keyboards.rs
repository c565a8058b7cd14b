//! Keyboards attached to replies.

use intervalcards_core::types::{
    InlineButton, Keyboard, Language, MAX_INTERVAL_HOURS, MIN_INTERVAL_HOURS, UserRecord, WordEntry,
};

use crate::action::{ActionKey, CATEGORY_PREFIX, LANGUAGE_PREFIX, LEARNING_LANGUAGE_PREFIX};
use crate::categories::CATEGORIES;
use crate::i18n::{MenuButton, Text, fill, t};

fn menu(lang: Language, rows: &[&[MenuButton]]) -> Keyboard {
    Keyboard::Menu(
        rows.iter()
            .map(|row| row.iter().map(|b| b.label(lang).to_string()).collect())
            .collect(),
    )
}

pub fn main_menu(lang: Language) -> Keyboard {
    menu(
        lang,
        &[
            &[MenuButton::ShowAll],
            &[MenuButton::AddWord, MenuButton::RemoveWord],
            &[MenuButton::StartLearn, MenuButton::StopLearn],
        ],
    )
}

pub fn adding_menu(lang: Language) -> Keyboard {
    menu(lang, &[&[MenuButton::ShowAll], &[MenuButton::Finish, MenuButton::Cancel]])
}

pub fn removing_menu(lang: Language) -> Keyboard {
    adding_menu(lang)
}

pub fn learning_menu(lang: Language) -> Keyboard {
    menu(lang, &[&[MenuButton::StopLearn]])
}

/// One button per allowed interval; the token is the bare number.
pub fn intervals(lang: Language) -> Keyboard {
    Keyboard::Inline(
        (MIN_INTERVAL_HOURS..=MAX_INTERVAL_HOURS)
            .map(|h| {
                let label = if h == 1 {
                    t(lang, Text::EveryHour).to_string()
                } else {
                    fill(t(lang, Text::EveryNHours), &[("n", h.to_string().as_str())])
                };
                vec![InlineButton::new(label, h.to_string())]
            })
            .collect(),
    )
}

pub fn interface_languages() -> Keyboard {
    Keyboard::Inline(
        Language::INTERFACE
            .iter()
            .map(|l| vec![InlineButton::new(l.native_label(), format!("{LANGUAGE_PREFIX}{}", l.code()))])
            .collect(),
    )
}

pub fn learning_languages() -> Keyboard {
    Keyboard::Inline(
        Language::LEARNING
            .chunks(2)
            .map(|pair| {
                pair.iter()
                    .map(|l| InlineButton::new(l.native_label(), format!("{LEARNING_LANGUAGE_PREFIX}{}", l.code())))
                    .collect()
            })
            .collect(),
    )
}

/// Two categories per row, selected ones marked with ✅.
pub fn categories(user: &UserRecord) -> Keyboard {
    let buttons: Vec<InlineButton> = CATEGORIES
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let label = if user.favorite_categories.contains(*name) {
                format!("✅ {name}")
            } else {
                (*name).to_string()
            };
            InlineButton::new(label, format!("{CATEGORY_PREFIX}{index}"))
        })
        .collect();
    Keyboard::Inline(buttons.chunks(2).map(<[InlineButton]>::to_vec).collect())
}

/// One button per word; the token is the word id.
pub fn remove_words(words: &[WordEntry]) -> Keyboard {
    Keyboard::Inline(
        words
            .iter()
            .map(|w| vec![InlineButton::new(w.word.clone(), w.id.clone())])
            .collect(),
    )
}

pub fn confirm(lang: Language, key: ActionKey) -> Keyboard {
    Keyboard::Inline(vec![vec![
        InlineButton::new(t(lang, Text::Yes), key.token(true)),
        InlineButton::new(t(lang, Text::No), key.token(false)),
    ]])
}
