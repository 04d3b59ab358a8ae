// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes. The Telegram token is the only mandatory credential: the bot
//! cannot start without its transport. Missing backend keys merely disable
//! the corresponding capability.

use thiserror::Error;

use crate::model::CourierConfig;

/// A configuration validation error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment failed to parse or merge the config sources.
    #[error("{0}")]
    Parse(#[from] Box<figment::Error>),

    /// A semantic constraint failed after deserialization.
    #[error("{message}")]
    Validation { message: String },
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or all collected validation
/// errors (does not fail fast).
pub fn validate_config(config: &CourierConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // The transport credential is fatal when absent.
    match &config.telegram.bot_token {
        None => errors.push(ConfigError::Validation {
            message: "telegram.bot_token is required (set COURIER_TELEGRAM_BOT_TOKEN)"
                .to_string(),
        }),
        Some(token) if token.trim().is_empty() => errors.push(ConfigError::Validation {
            message: "telegram.bot_token must not be empty".to_string(),
        }),
        Some(_) => {}
    }

    if config.telegram.message_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "telegram.message_limit must be positive".to_string(),
        });
    }

    if config.router.max_retries == 0 {
        errors.push(ConfigError::Validation {
            message: "router.max_retries must be at least 1".to_string(),
        });
    }

    if config.session.max_turns == 0 {
        errors.push(ConfigError::Validation {
            message: "session.max_turns must be at least 1".to_string(),
        });
    }

    if config.session.context_window > config.session.max_turns {
        errors.push(ConfigError::Validation {
            message: format!(
                "session.context_window ({}) must not exceed session.max_turns ({})",
                config.session.context_window, config.session.max_turns
            ),
        });
    }

    if config.session.dedup_window == 0 {
        errors.push(ConfigError::Validation {
            message: "session.dedup_window must be at least 1".to_string(),
        });
    }

    if config.browser.navigation_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "browser.navigation_timeout_secs must be at least 1".to_string(),
        });
    }

    if !(0.0..=2.0).contains(&config.gemini.temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "gemini.temperature must be in [0.0, 2.0], got {}",
                config.gemini.temperature
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Print validation errors to stderr, one per line.
pub fn render_errors(errors: &[ConfigError]) {
    for err in errors {
        eprintln!("error: {err}");
    }
}
