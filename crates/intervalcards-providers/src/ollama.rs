//! Ollama provider for a local or remote Ollama server.

use async_trait::async_trait;
use intervalcards_core::config::LlmConfig;
use intervalcards_core::error::{IntervalCardsError, Result};
use intervalcards_core::traits::{CompletionParams, CompletionProvider};

use crate::http::{client_with_timeout, status_error, transport_error};

const DEFAULT_HOST: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3.2";

pub struct OllamaProvider {
    api_url: String,
    default_model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_url = std::env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_HOST.into());
        Self::with_host(api_url, config)
    }

    /// Point at an explicit server instead of `OLLAMA_HOST`.
    pub fn with_host(api_url: impl Into<String>, config: &LlmConfig) -> Result<Self> {
        // The OpenRouter-style model id is meaningless to a local server
        let default_model = if config.model.contains('/') {
            DEFAULT_MODEL.to_string()
        } else {
            config.model.clone()
        };
        Ok(Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            default_model,
            client: client_with_timeout("ollama", config.timeout_secs)?,
        })
    }
}

#[async_trait]
impl CompletionProvider for OllamaProvider {
    fn name(&self) -> &str { "ollama" }

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: &CompletionParams,
    ) -> Result<String> {
        let model = if params.model.is_empty() || params.model.contains('/') {
            self.default_model.as_str()
        } else {
            params.model.as_str()
        };

        let body = serde_json::json!({
            "model": model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "stream": false,
            "options": {
                "temperature": params.temperature,
                "num_predict": params.max_tokens,
            }
        });

        let resp = self.client
            .post(format!("{}/api/chat", self.api_url))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error("Ollama", e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(status_error("Ollama", status, &text));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| transport_error("Ollama", e))?;

        if json["done_reason"].as_str() == Some("length") {
            return Err(IntervalCardsError::provider("Ollama response truncated (num_predict reached)"));
        }

        json["message"]["content"]
            .as_str()
            .filter(|c| !c.trim().is_empty())
            .map(String::from)
            .ok_or_else(|| IntervalCardsError::provider("Ollama returned empty content"))
    }

    async fn health_check(&self) -> Result<bool> {
        let resp = self.client
            .get(format!("{}/api/tags", self.api_url))
            .send()
            .await;
        Ok(resp.map(|r| r.status().is_success()).unwrap_or(false))
    }
}
