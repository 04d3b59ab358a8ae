// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` API.
//!
//! One request per call: retry and fallback live in the router, so this
//! client maps each HTTP outcome to a [`BackendError`] and returns.

use std::time::Duration;

use async_trait::async_trait;
use courier_config::GeminiConfig;
use courier_core::error::BackendError;
use courier_core::traits::CompletionBackend;
use courier_core::types::{ConversationTurn, Role};
use tracing::debug;

use crate::types::{
    ApiErrorResponse, Content, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig,
};

/// Gemini completion backend. First in the fallback chain.
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
    request_timeout: Duration,
}

impl GeminiBackend {
    /// Builds the backend from configuration. A missing API key produces a
    /// valid but unavailable backend; the router skips it.
    pub fn new(config: &GeminiConfig, request_timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| BackendError::Unknown(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
            request_timeout,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_request(
        &self,
        turns: &[ConversationTurn],
        system_prompt: Option<&str>,
    ) -> GenerateContentRequest {
        let contents = turns
            .iter()
            .map(|turn| {
                // Gemini has no system role inside contents; stray system
                // turns are delivered as user text.
                let role = match turn.role {
                    Role::Assistant => "model",
                    Role::User | Role::System => "user",
                };
                Content::with_role(role, turn.content.clone())
            })
            .collect();

        GenerateContentRequest {
            contents,
            system_instruction: system_prompt.map(Content::system),
            generation_config: GenerationConfig {
                temperature: self.temperature,
                top_p: self.top_p,
                max_output_tokens: self.max_tokens,
            },
        }
    }
}

#[async_trait]
impl CompletionBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    fn priority(&self) -> u8 {
        1
    }

    fn is_available(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    async fn complete(
        &self,
        turns: &[ConversationTurn],
        system_prompt: Option<&str>,
    ) -> Result<String, BackendError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| BackendError::AuthFailure("gemini api key not configured".into()))?;

        let request = self.build_request(turns, system_prompt);
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Timeout {
                        duration: self.request_timeout,
                    }
                } else {
                    BackendError::Unknown(format!("gemini request failed: {e}"))
                }
            })?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "gemini response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!("{} ({})", api_err.error.message, api_err.error.status),
                Err(_) => format!("gemini returned {status}: {body}"),
            };
            return Err(match status.as_u16() {
                401 | 403 => BackendError::AuthFailure(message),
                429 => BackendError::RateLimited(message),
                _ => BackendError::Unknown(message),
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Unknown(format!("failed to parse gemini response: {e}")))?;

        body.first_text()
            .ok_or_else(|| BackendError::Unknown("gemini returned no candidates".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_backend(base_url: &str) -> GeminiBackend {
        let config = GeminiConfig {
            api_key: Some("test-key".into()),
            base_url: base_url.to_string(),
            ..GeminiConfig::default()
        };
        GeminiBackend::new(&config, Duration::from_secs(5)).unwrap()
    }

    fn turns() -> Vec<ConversationTurn> {
        vec![
            ConversationTurn::user("hola"),
            ConversationTurn::assistant("¿en qué puedo ayudar?"),
            ConversationTurn::user("cuéntame algo"),
        ]
    }

    #[test]
    fn unavailable_without_key() {
        let backend =
            GeminiBackend::new(&GeminiConfig::default(), Duration::from_secs(5)).unwrap();
        assert!(!backend.is_available());

        let config = GeminiConfig {
            api_key: Some(String::new()),
            ..GeminiConfig::default()
        };
        let backend = GeminiBackend::new(&config, Duration::from_secs(5)).unwrap();
        assert!(!backend.is_available(), "empty key is not configured");
    }

    #[test]
    fn assistant_turns_map_to_model_role() {
        let backend = test_backend("http://unused");
        let request = backend.build_request(&turns(), Some("sé breve"));

        assert_eq!(request.contents.len(), 3);
        assert_eq!(request.contents[0].role.as_deref(), Some("user"));
        assert_eq!(request.contents[1].role.as_deref(), Some("model"));
        assert_eq!(request.contents[2].role.as_deref(), Some("user"));
        assert_eq!(
            request.system_instruction.unwrap().parts[0].text,
            "sé breve"
        );
    }

    #[tokio::test]
    async fn complete_success() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "claro que sí"}]}
            }]
        });

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "generationConfig": {"temperature": 0.7, "topP": 0.95, "maxOutputTokens": 1024}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let backend = test_backend(&server.uri());
        let reply = backend.complete(&turns(), Some("sé breve")).await.unwrap();
        assert_eq!(reply, "claro que sí");
    }

    #[tokio::test]
    async fn forbidden_maps_to_auth_failure() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "error": {"code": 403, "message": "API key invalid", "status": "PERMISSION_DENIED"}
        });

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_json(&body))
            .mount(&server)
            .await;

        let backend = test_backend(&server.uri());
        let err = backend.complete(&turns(), None).await.unwrap_err();
        assert!(matches!(err, BackendError::AuthFailure(_)), "got: {err:?}");
        assert!(err.to_string().contains("PERMISSION_DENIED"));
    }

    #[tokio::test]
    async fn rate_limit_maps_to_rate_limited() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}
        });

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(&body))
            .mount(&server)
            .await;

        let backend = test_backend(&server.uri());
        let err = backend.complete(&turns(), None).await.unwrap_err();
        assert!(matches!(err, BackendError::RateLimited(_)), "got: {err:?}");
    }

    #[tokio::test]
    async fn server_error_maps_to_unknown() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let backend = test_backend(&server.uri());
        let err = backend.complete(&turns(), None).await.unwrap_err();
        assert!(matches!(err, BackendError::Unknown(_)), "got: {err:?}");
    }

    #[tokio::test]
    async fn empty_candidates_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})),
            )
            .mount(&server)
            .await;

        let backend = test_backend(&server.uri());
        let err = backend.complete(&turns(), None).await.unwrap_err();
        assert!(err.to_string().contains("no candidates"));
    }
}
