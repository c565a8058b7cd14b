//! Prompts sent to the completion provider.

pub const WORD_SET_SYSTEM_PROMPT: &str = r#"You are a language learning assistant. Generate a list of basic vocabulary words for language learners.

Requirements:
- Return ONLY valid JSON array without any markdown formatting or code blocks
- Each object must have "word" and "translation" fields
- Words should be appropriate for the specified categories
- Translations should be accurate and commonly used
- Focus on basic, everyday vocabulary
- Do NOT include words from the exclusion list (if provided)

Example format:
[{"word":"cat","translation":"кіт"},{"word":"dog","translation":"собака"}]"#;

/// User prompt for one attempt.
pub fn user_prompt<'a>(
    categories: &[String],
    learning_language: &str,
    native_language: &str,
    count: usize,
    excluded: impl IntoIterator<Item = &'a String>,
) -> String {
    let mut prompt = format!(
        "Generate {count} basic vocabulary words for these categories: {} in {learning_language} with translations to {native_language}.",
        categories.join(", ")
    );
    let excluded: Vec<&str> = excluded.into_iter().map(String::as_str).collect();
    if !excluded.is_empty() {
        prompt.push_str("\nExclusion list (do NOT use these words): ");
        prompt.push_str(&excluded.join(", "));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_without_exclusions() {
        let prompt = user_prompt(&["Animals".into(), "Food".into()], "English", "Ukrainian", 8, &Vec::new());
        assert_eq!(
            prompt,
            "Generate 8 basic vocabulary words for these categories: Animals, Food in English with translations to Ukrainian."
        );
    }

    #[test]
    fn test_user_prompt_lists_exclusions() {
        let excluded = vec!["cat".to_string(), "dog".to_string()];
        let prompt = user_prompt(&["Animals".into()], "English", "Ukrainian", 3, &excluded);
        assert!(prompt.ends_with("cat, dog"));
    }
}
