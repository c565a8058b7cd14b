//! Word-set generation: cache lookup plus a bounded uniqueness loop.

use intervalcards_core::config::GeneratorConfig;
use intervalcards_core::error::{IntervalCardsError, Result};
use intervalcards_core::traits::{CompletionParams, CompletionProvider};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{WordSetCache, cache_key};
use crate::parse::parse_candidates;
use crate::prompt::{WORD_SET_SYSTEM_PROMPT, user_prompt};
use crate::{GeneratedWord, normalize};

/// What to generate.
#[derive(Debug, Clone, Default)]
pub struct WordSetRequest {
    pub categories: Vec<String>,
    pub learning_language: String,
    pub native_language: String,
    pub count: usize,
    /// Words the result must not contain (compared case-insensitively).
    pub excluded_words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordSetResult {
    pub words: Vec<GeneratedWord>,
    pub cached: bool,
}

pub struct WordSetGenerator {
    provider: Arc<dyn CompletionProvider>,
    params: CompletionParams,
    cache: WordSetCache,
    max_attempts: u32,
    over_request_factor: f64,
}

impl WordSetGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>, config: &GeneratorConfig, params: CompletionParams) -> Self {
        Self {
            provider,
            params,
            cache: WordSetCache::new(Duration::from_secs(config.cache_ttl_secs)),
            max_attempts: config.max_attempts.max(1),
            over_request_factor: config.over_request_factor.max(1.0),
        }
    }

    pub fn cache(&self) -> &WordSetCache {
        &self.cache
    }

    /// Generate `request.count` distinct words.
    ///
    /// Returns fewer words (with a warning) when the attempts run out after at
    /// least one word was accepted, and `GenerationExhausted` when none was.
    pub async fn generate(&self, request: &WordSetRequest) -> Result<WordSetResult> {
        if request.count == 0 {
            return Err(IntervalCardsError::validation("Requested word count must be > 0"));
        }
        if request.categories.is_empty() {
            return Err(IntervalCardsError::validation("At least one category is required"));
        }

        let key = cache_key(
            &request.categories,
            &request.learning_language,
            &request.native_language,
            request.count,
        );
        let cacheable = request.excluded_words.is_empty();

        if cacheable {
            if let Some(words) = self.cache.get(&key) {
                tracing::info!(key = %key, count = words.len(), "📦 Word set cache hit");
                return Ok(WordSetResult { words, cached: true });
            }
        }

        let mut excluded: BTreeSet<String> = request
            .excluded_words
            .iter()
            .map(|w| normalize(w))
            .filter(|w| !w.is_empty())
            .collect();
        let mut accepted: Vec<GeneratedWord> = Vec::with_capacity(request.count);
        let mut attempts = 0;

        while accepted.len() < request.count && attempts < self.max_attempts {
            attempts += 1;
            let needed = request.count - accepted.len();
            let ask = (needed as f64 * self.over_request_factor).ceil() as usize;
            let prompt = user_prompt(
                &request.categories,
                &request.learning_language,
                &request.native_language,
                ask,
                &excluded,
            );

            tracing::debug!(attempt = attempts, needed, ask, "Requesting word set");
            let raw = match self.provider.complete(WORD_SET_SYSTEM_PROMPT, &prompt, &self.params).await {
                Ok(raw) => raw,
                Err(e) if accepted.is_empty() => return Err(e),
                Err(e) => {
                    tracing::warn!("⚠️ Completion failed after partial progress: {e}");
                    break;
                }
            };

            let candidates = match parse_candidates(&raw) {
                Ok(candidates) => candidates,
                Err(e) => {
                    tracing::warn!(attempt = attempts, "⚠️ Discarding unparseable completion: {e}");
                    continue;
                }
            };

            for candidate in candidates {
                if excluded.insert(candidate.key()) {
                    accepted.push(candidate);
                    if accepted.len() == request.count {
                        break;
                    }
                }
            }
        }

        if accepted.is_empty() {
            return Err(IntervalCardsError::GenerationExhausted { attempts });
        }

        if accepted.len() < request.count {
            tracing::warn!(
                requested = request.count,
                generated = accepted.len(),
                attempts,
                "⚠️ Partial word set returned"
            );
        }
        if cacheable {
            self.cache.insert(key, accepted.clone());
        }

        tracing::info!(
            categories = %request.categories.join(", "),
            learning_language = %request.learning_language,
            count = accepted.len(),
            attempts,
            "✨ Word set generated"
        );

        Ok(WordSetResult { words: accepted, cached: false })
    }
}
