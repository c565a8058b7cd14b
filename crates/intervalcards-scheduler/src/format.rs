//! Tick message formatting.

use intervalcards_core::text::escape_markdown_v2;
use intervalcards_core::types::WordEntry;

/// MarkdownV2 text for one delivered entry: bold word, translation hidden as a spoiler.
pub fn format_word(entry: &WordEntry) -> String {
    let mut text = format!("*{}*", escape_markdown_v2(&entry.word));
    if let Some(translation) = &entry.translation {
        text.push_str(" \\- ||");
        text.push_str(&escape_markdown_v2(translation));
        text.push_str("||");
    }
    if let Some(comment) = &entry.comment {
        text.push_str("\n_");
        text.push_str(&escape_markdown_v2(comment));
        text.push('_');
    }
    if let Some(example) = &entry.example {
        text.push('\n');
        text.push_str(&escape_markdown_v2(example));
    }
    text
}
