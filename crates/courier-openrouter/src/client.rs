// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenRouter's chat completions API.
//!
//! Secondary backend in the fallback chain. Like the Gemini client, it sends
//! exactly one request per call and leaves retries to the router.

use std::time::Duration;

use async_trait::async_trait;
use courier_config::OpenRouterConfig;
use courier_core::error::BackendError;
use courier_core::traits::CompletionBackend;
use courier_core::types::{ConversationTurn, Role};
use tracing::debug;

use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

const DEFAULT_TEMPERATURE: f64 = 0.7;
const DEFAULT_TOP_P: f64 = 0.95;

/// OpenRouter completion backend. Second in the fallback chain.
#[derive(Debug, Clone)]
pub struct OpenRouterBackend {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    max_tokens: u32,
    request_timeout: Duration,
}

impl OpenRouterBackend {
    /// Builds the backend from configuration. A missing API key produces a
    /// valid but unavailable backend.
    pub fn new(
        config: &OpenRouterConfig,
        request_timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| BackendError::Unknown(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_tokens: config.max_tokens,
            request_timeout,
        })
    }

    fn build_request(
        &self,
        turns: &[ConversationTurn],
        system_prompt: Option<&str>,
    ) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        if let Some(prompt) = system_prompt {
            messages.push(ChatMessage::new("system", prompt));
        }
        for turn in turns {
            let role = match turn.role {
                Role::User => "user",
                Role::Assistant => "assistant",
                Role::System => "system",
            };
            messages.push(ChatMessage::new(role, turn.content.clone()));
        }

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: self.max_tokens,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenRouterBackend {
    fn name(&self) -> &str {
        "openrouter"
    }

    fn priority(&self) -> u8 {
        2
    }

    fn is_available(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    async fn complete(
        &self,
        turns: &[ConversationTurn],
        system_prompt: Option<&str>,
    ) -> Result<String, BackendError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            BackendError::AuthFailure("openrouter api key not configured".into())
        })?;

        let request = self.build_request(turns, system_prompt);
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Timeout {
                        duration: self.request_timeout,
                    }
                } else {
                    BackendError::Unknown(format!("openrouter request failed: {e}"))
                }
            })?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "openrouter response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => api_err.error.message,
                Err(_) => format!("openrouter returned {status}: {body}"),
            };
            return Err(match status.as_u16() {
                401 | 403 => BackendError::AuthFailure(message),
                429 => BackendError::RateLimited(message),
                _ => BackendError::Unknown(message),
            });
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|e| {
            BackendError::Unknown(format!("failed to parse openrouter response: {e}"))
        })?;

        body.first_content()
            .map(str::to_string)
            .ok_or_else(|| BackendError::Unknown("openrouter returned no choices".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_backend(base_url: &str) -> OpenRouterBackend {
        let config = OpenRouterConfig {
            api_key: Some("test-key".into()),
            base_url: base_url.to_string(),
            ..OpenRouterConfig::default()
        };
        OpenRouterBackend::new(&config, Duration::from_secs(5)).unwrap()
    }

    fn turns() -> Vec<ConversationTurn> {
        vec![
            ConversationTurn::user("hola"),
            ConversationTurn::assistant("buenas"),
            ConversationTurn::user("sigue"),
        ]
    }

    #[test]
    fn unavailable_without_key() {
        let backend =
            OpenRouterBackend::new(&OpenRouterConfig::default(), Duration::from_secs(5)).unwrap();
        assert!(!backend.is_available());
    }

    #[test]
    fn system_prompt_is_prepended() {
        let backend = test_backend("http://unused");
        let request = backend.build_request(&turns(), Some("sé breve"));

        assert_eq!(request.messages.len(), 4);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[0].content, "sé breve");
        assert_eq!(request.messages[1].role, "user");
        assert_eq!(request.messages[2].role, "assistant");
        assert_eq!(request.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(request.top_p, DEFAULT_TOP_P);
    }

    #[tokio::test]
    async fn complete_success_with_bearer_auth() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "id": "gen-1",
            "choices": [
                {"message": {"role": "assistant", "content": "hola de nuevo"}}
            ]
        });

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(
                serde_json::json!({"model": "anthropic/claude-3-haiku"}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let backend = test_backend(&server.uri());
        let reply = backend.complete(&turns(), None).await.unwrap();
        assert_eq!(reply, "hola de nuevo");
    }

    #[tokio::test]
    async fn unauthorized_maps_to_auth_failure() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "error": {"message": "Invalid API key", "code": 401}
        });

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(&body))
            .mount(&server)
            .await;

        let backend = test_backend(&server.uri());
        let err = backend.complete(&turns(), None).await.unwrap_err();
        assert!(matches!(err, BackendError::AuthFailure(_)), "got: {err:?}");
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[tokio::test]
    async fn rate_limit_maps_to_rate_limited() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let backend = test_backend(&server.uri());
        let err = backend.complete(&turns(), None).await.unwrap_err();
        assert!(matches!(err, BackendError::RateLimited(_)), "got: {err:?}");
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let backend = test_backend(&server.uri());
        let err = backend.complete(&turns(), None).await.unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }
}
