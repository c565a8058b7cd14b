//! Completion provider trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Parameters for a single completion request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

/// A text-completion collaborator.
///
/// Implementations map failures to distinct error variants: `AuthFailed`,
/// `RateLimited`, `Unavailable`, `Timeout`, or `Provider` for anything else.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: &CompletionParams,
    ) -> Result<String>;

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
