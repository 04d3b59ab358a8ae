// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message routing for the Courier relay agent.
//!
//! This crate provides:
//! - [`classify`]: heuristic tool-intent detection (zero-cost, zero-latency)
//! - [`BackendRouter`]: prioritized fallback across completion backends with
//!   per-candidate retry and linear backoff
//!
//! The classifier intercepts messages before any LLM call; matched intents
//! short-circuit into direct tool paths, everything else flows through the
//! router's fallback chain.

pub mod fallback;
pub mod intent;

pub use fallback::BackendRouter;
pub use intent::{ToolIntent, classify};
