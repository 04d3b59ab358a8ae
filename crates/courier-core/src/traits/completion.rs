// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion backend trait for text-generation providers (Gemini, OpenRouter).

use async_trait::async_trait;

use crate::error::BackendError;
use crate::types::ConversationTurn;

/// An interchangeable response-generation backend.
///
/// Backends are selected by ascending `priority`; `is_available` reflects
/// static configuration (a missing credential), not transient health, and is
/// resolved once per routing call.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Human-readable backend name, used in logs and `/status`.
    fn name(&self) -> &str;

    /// Fallback position; lower tries first.
    fn priority(&self) -> u8;

    /// Whether this backend is configured (credential present).
    fn is_available(&self) -> bool;

    /// Generates a reply for the given conversation window.
    ///
    /// The turns are the caller's read snapshot, oldest first; the optional
    /// system prompt is delivered however the provider's API expects it.
    async fn complete(
        &self,
        turns: &[ConversationTurn],
        system_prompt: Option<&str>,
    ) -> Result<String, BackendError>;
}
