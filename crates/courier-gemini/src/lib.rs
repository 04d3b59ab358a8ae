// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini completion backend.
//!
//! Implements [`courier_core::traits::CompletionBackend`] over the
//! `generateContent` REST API. Conversation roles map to Gemini's
//! `user`/`model` pair and the system prompt travels as `systemInstruction`.

pub mod client;
pub mod types;

pub use client::GeminiBackend;
