// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenRouter completion backend.
//!
//! Implements [`courier_core::traits::CompletionBackend`] over OpenRouter's
//! OpenAI-compatible chat completions API. Serves as the fallback when
//! Gemini is unavailable or exhausted.

pub mod client;
pub mod types;

pub use client::OpenRouterBackend;
