//! OpenRouter provider: OpenAI-compatible chat completions.

use async_trait::async_trait;
use intervalcards_core::config::LlmConfig;
use intervalcards_core::error::{IntervalCardsError, Result};
use intervalcards_core::traits::{CompletionParams, CompletionProvider};
use serde::Deserialize;

use crate::http::{client_with_timeout, status_error, transport_error};

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

pub struct OpenRouterProvider {
    api_url: String,
    api_key: String,
    default_model: String,
    client: reqwest::Client,
}

impl OpenRouterProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(IntervalCardsError::config(
                "OpenRouter API key missing (set OPENROUTER_API_KEY or llm.api_key)",
            ));
        }
        Ok(Self {
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            default_model: config.model.clone(),
            client: client_with_timeout("openrouter", config.timeout_secs)?,
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    fn name(&self) -> &str { "openrouter" }

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: &CompletionParams,
    ) -> Result<String> {
        let model = if params.model.is_empty() {
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
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
        });

        let resp = self.client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("X-Title", "IntervalCards")
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error("OpenRouter", e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(status_error("OpenRouter", status, &text));
        }

        let completion: ChatCompletion = resp
            .json()
            .await
            .map_err(|e| transport_error("OpenRouter", e))?;

        if let Some(usage) = &completion.usage {
            tracing::debug!(
                model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "OpenRouter completion"
            );
        }

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| IntervalCardsError::provider("OpenRouter returned no choices"))?;

        if choice.finish_reason.as_deref() == Some("length") {
            return Err(IntervalCardsError::provider(
                "OpenRouter response truncated (max_tokens reached)",
            ));
        }

        choice
            .message
            .and_then(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| IntervalCardsError::provider("OpenRouter returned empty content"))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.api_key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer, timeout_secs: u64) -> OpenRouterProvider {
        let config = LlmConfig {
            api_url: format!("{}/api/v1/chat/completions", server.uri()),
            api_key: "sk-or-test".into(),
            timeout_secs,
            ..LlmConfig::default()
        };
        OpenRouterProvider::new(&config).unwrap()
    }

    fn completion(content: &str, finish_reason: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": content },
                "finish_reason": finish_reason,
            }],
            "usage": { "prompt_tokens": 12, "completion_tokens": 34 }
        })
    }

    async fn complete(provider: &OpenRouterProvider) -> Result<String> {
        provider
            .complete("system", "user", &CompletionParams::default())
            .await
    }

    #[tokio::test]
    async fn test_complete_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-or-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("[]", "stop")))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server, 5);
        assert_eq!(complete(&provider).await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_status_codes_map_to_typed_errors() {
        for code in [401u16, 429, 503, 400] {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(code).set_body_string("nope"))
                .mount(&server)
                .await;

            let err = complete(&provider_for(&server, 5)).await.unwrap_err();
            let mapped = match code {
                401 => matches!(err, IntervalCardsError::AuthFailed(_)),
                429 => matches!(err, IntervalCardsError::RateLimited(_)),
                503 => matches!(err, IntervalCardsError::Unavailable(_)),
                _ => matches!(err, IntervalCardsError::Provider(_)),
            };
            assert!(mapped, "status {code} mapped to {err:?}");
        }
    }

    #[tokio::test]
    async fn test_timeout_is_typed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("[]", "stop"))
                    .set_delay(std::time::Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = complete(&provider_for(&server, 1)).await.unwrap_err();
        assert!(matches!(err, IntervalCardsError::Timeout(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_truncated_response_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("[{\"word\":", "length")))
            .mount(&server)
            .await;

        let err = complete(&provider_for(&server, 5)).await.unwrap_err();
        assert!(matches!(err, IntervalCardsError::Provider(_)));
    }

    #[tokio::test]
    async fn test_missing_content_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": null }, "finish_reason": "stop" }]
            })))
            .mount(&server)
            .await;

        let err = complete(&provider_for(&server, 5)).await.unwrap_err();
        assert!(matches!(err, IntervalCardsError::Provider(_)));
    }
}
