// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Courier relay agent.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Courier configuration.
///
/// Loaded from TOML following the XDG hierarchy, with `COURIER_*`
/// environment variable overrides. All sections default to sensible values;
/// only `telegram.bot_token` is mandatory (validated at startup).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CourierConfig {
    /// Agent identity and behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram transport settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Gemini completion backend settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// OpenRouter completion backend settings.
    #[serde(default)]
    pub openrouter: OpenRouterConfig,

    /// Serper search backend settings.
    #[serde(default)]
    pub serper: SerperConfig,

    /// Browser automation settings.
    #[serde(default)]
    pub browser: BrowserConfig,

    /// Router retry/fallback settings.
    #[serde(default)]
    pub router: RouterConfig,

    /// Conversation memory and dedup settings.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Agent identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// System prompt sent to completion backends.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            system_prompt: default_system_prompt(),
        }
    }
}

fn default_agent_name() -> String {
    "courier".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_system_prompt() -> String {
    "Eres un asistente amable y útil. Responde de manera concisa y clara. \
     Eres capaz de navegar por internet, analizar información y ayudar al \
     usuario con sus preguntas."
        .to_string()
}

/// Telegram transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Mandatory: startup fails without it.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Maximum characters per outbound message before chunking.
    #[serde(default = "default_message_limit")]
    pub message_limit: usize,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            message_limit: default_message_limit(),
        }
    }
}

fn default_message_limit() -> usize {
    4096
}

/// Gemini completion backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` disables the backend.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API base URL.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Nucleus sampling parameter.
    #[serde(default = "default_top_p")]
    pub top_p: f64,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

/// OpenRouter completion backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenRouterConfig {
    /// OpenRouter API key. `None` disables the backend.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier.
    #[serde(default = "default_openrouter_model")]
    pub model: String,

    /// API base URL.
    #[serde(default = "default_openrouter_base_url")]
    pub base_url: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_openrouter_model(),
            base_url: default_openrouter_base_url(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_openrouter_model() -> String {
    "anthropic/claude-3-haiku".to_string()
}

fn default_openrouter_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_top_p() -> f64 {
    0.95
}

fn default_max_tokens() -> u32 {
    1024
}

/// Serper search backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SerperConfig {
    /// Serper API key. `None` disables search and the price tool.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL.
    #[serde(default = "default_serper_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_serper_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SerperConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_serper_base_url(),
            timeout_secs: default_serper_timeout_secs(),
        }
    }
}

fn default_serper_base_url() -> String {
    "https://google.serper.dev".to_string()
}

fn default_serper_timeout_secs() -> u64 {
    10
}

/// Browser automation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BrowserConfig {
    /// Run the browser headless.
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Per-navigation timeout in seconds.
    #[serde(default = "default_navigation_timeout_secs")]
    pub navigation_timeout_secs: u64,

    /// Maximum characters of page text kept for context.
    #[serde(default = "default_page_text_limit")]
    pub page_text_limit: usize,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            navigation_timeout_secs: default_navigation_timeout_secs(),
            page_text_limit: default_page_text_limit(),
        }
    }
}

fn default_headless() -> bool {
    true
}

fn default_navigation_timeout_secs() -> u64 {
    30
}

fn default_page_text_limit() -> usize {
    2000
}

/// Router retry and fallback configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Invocation attempts per backend before advancing to the next one.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff delay in milliseconds; attempt `n` waits `n * base`.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Per-invocation timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Conversation memory and deduplication configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Maximum turns retained per user (FIFO eviction).
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    /// Turns of recent context sent per completion call.
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Update ids tracked for duplicate suppression.
    #[serde(default = "default_dedup_window")]
    pub dedup_window: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            context_window: default_context_window(),
            dedup_window: default_dedup_window(),
        }
    }
}

fn default_max_turns() -> usize {
    50
}

fn default_context_window() -> usize {
    10
}

fn default_dedup_window() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_bot_constants() {
        let config = CourierConfig::default();
        assert_eq!(config.telegram.message_limit, 4096);
        assert_eq!(config.session.max_turns, 50);
        assert_eq!(config.session.context_window, 10);
        assert_eq!(config.session.dedup_window, 100);
        assert_eq!(config.router.max_retries, 3);
        assert_eq!(config.router.retry_delay_ms, 1000);
        assert_eq!(config.browser.navigation_timeout_secs, 30);
        assert_eq!(config.browser.page_text_limit, 2000);
    }

    #[test]
    fn backends_disabled_without_keys() {
        let config = CourierConfig::default();
        assert!(config.gemini.api_key.is_none());
        assert!(config.openrouter.api_key.is_none());
        assert!(config.serper.api_key.is_none());
        assert!(config.telegram.bot_token.is_none());
    }

    #[test]
    fn unknown_field_rejected() {
        let toml = "[agent]\nname = \"x\"\nnot_a_field = 1\n";
        let result: Result<CourierConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }
}
