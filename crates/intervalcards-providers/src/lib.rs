//! # IntervalCards Providers
//! Text-completion collaborators used by the word-set generator.

pub mod http;
pub mod ollama;
pub mod openrouter;

use intervalcards_core::config::LlmConfig;
use intervalcards_core::error::{IntervalCardsError, Result};
use intervalcards_core::traits::CompletionProvider;
use std::sync::Arc;

pub use ollama::OllamaProvider;
pub use openrouter::OpenRouterProvider;

/// Create a completion provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn CompletionProvider>> {
    match config.provider.as_str() {
        "openrouter" => Ok(Arc::new(OpenRouterProvider::new(config)?)),
        "ollama" => Ok(Arc::new(OllamaProvider::new(config)?)),
        other => Err(IntervalCardsError::config(format!("Unknown LLM provider: {other}"))),
    }
}
