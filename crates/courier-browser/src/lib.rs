// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Browser automation for the Courier relay agent.
//!
//! [`SessionManager`] owns one lazily-initialized Chromium session per user
//! with single-flight access; [`ChromiumSession`](chromium::ChromiumSession)
//! drives the CDP through `headless_chrome`; [`scrape`] extracts headlines
//! from fetched pages and provides the plain-HTTP fallback.

pub mod chromium;
pub mod manager;
pub mod scrape;

pub use chromium::ChromiumBackend;
pub use manager::SessionManager;
