//! Validation of raw completion text into typed candidates.

use intervalcards_core::error::{IntervalCardsError, Result};
use serde_json::Value;

use crate::GeneratedWord;

/// Remove markdown code fences the model may wrap its JSON in.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.strip_prefix("json").unwrap_or(rest);
    }
    text.strip_suffix("```").unwrap_or(text).trim()
}

/// Parse a completion into candidates.
///
/// A payload that is not a JSON array is an error. Array items without a
/// non-empty string `word` and `translation` are skipped.
pub fn parse_candidates(raw: &str) -> Result<Vec<GeneratedWord>> {
    let value: Value = serde_json::from_str(strip_code_fences(raw))
        .map_err(|e| IntervalCardsError::Parse(format!("Invalid word set JSON: {e}")))?;

    let Value::Array(items) = value else {
        return Err(IntervalCardsError::Parse("Word set response is not an array".into()));
    };

    Ok(items.iter().filter_map(candidate).collect())
}

fn candidate(item: &Value) -> Option<GeneratedWord> {
    let word = item.get("word")?.as_str()?.trim();
    let translation = item.get("translation")?.as_str()?.trim();
    if word.is_empty() || translation.is_empty() {
        return None;
    }
    Some(GeneratedWord::new(word, translation))
}
