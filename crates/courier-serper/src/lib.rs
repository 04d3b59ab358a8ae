// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serper web search backend.
//!
//! Implements [`courier_core::traits::SearchBackend`] over Serper's Google
//! search API. Queries are localized to Spain (`gl=es`, `hl=es`) to match
//! the agent's audience.

use std::time::Duration;

use async_trait::async_trait;
use courier_config::SerperConfig;
use courier_core::error::BackendError;
use courier_core::traits::SearchBackend;
use courier_core::types::SearchHit;
use serde::{Deserialize, Serialize};
use tracing::debug;

const RESULT_COUNT: u32 = 10;

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    gl: &'a str,
    hl: &'a str,
    num: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    date: Option<String>,
}

/// Serper search client.
#[derive(Debug, Clone)]
pub struct SerperBackend {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl SerperBackend {
    /// Builds the backend from configuration. A missing API key produces a
    /// valid but unavailable backend.
    pub fn new(config: &SerperConfig) -> Result<Self, BackendError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Unknown(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }
}

#[async_trait]
impl SearchBackend for SerperBackend {
    fn is_available(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, BackendError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| BackendError::AuthFailure("serper api key not configured".into()))?;

        let request = SearchRequest {
            q: query,
            gl: "es",
            hl: "es",
            num: RESULT_COUNT,
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("X-API-KEY", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Timeout {
                        duration: self.timeout,
                    }
                } else {
                    BackendError::Unknown(format!("serper request failed: {e}"))
                }
            })?;

        let status = response.status();
        debug!(status = %status, query, "serper response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => BackendError::AuthFailure(format!("serper rejected key: {body}")),
                429 => BackendError::RateLimited(format!("serper rate limited: {body}")),
                _ => BackendError::Unknown(format!("serper returned {status}: {body}")),
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Unknown(format!("failed to parse serper response: {e}")))?;

        Ok(body
            .organic
            .into_iter()
            .map(|r| SearchHit {
                title: r.title,
                link: r.link,
                snippet: r.snippet,
                date: r.date,
            })
            .collect())
    }
}
