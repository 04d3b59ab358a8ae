// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Courier integration tests.
//!
//! Provides mock backends for fast, deterministic, CI-runnable tests
//! without external services.
//!
//! # Components
//!
//! - [`MockCompletion`] - scripted completion backend with call counters
//! - [`MockSearch`] - search backend serving canned hits
//! - [`MockBrowser`] - browser backend counting launches and navigations

pub mod mock_browser;
pub mod mock_completion;
pub mod mock_search;

pub use mock_browser::{MockBrowser, MockBrowserSession};
pub use mock_completion::MockCompletion;
pub use mock_search::MockSearch;
