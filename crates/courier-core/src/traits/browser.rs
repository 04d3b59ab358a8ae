// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Browser automation backend traits.
//!
//! A [`BrowserBackend`] launches sessions; a [`BrowserSession`] is one live
//! browser with a page, reused across turns by the session manager until it
//! is explicitly closed.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BrowserError;
use crate::types::PageContent;

/// Factory for browser automation sessions.
#[async_trait]
pub trait BrowserBackend: Send + Sync {
    /// Launches a new underlying browser and returns its session handle.
    ///
    /// Expensive; callers are expected to reuse the returned session.
    async fn initialize(&self) -> Result<Arc<dyn BrowserSession>, BrowserError>;
}

/// One live browser session.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Navigates to `url` and returns the page content.
    async fn navigate(&self, url: &str) -> Result<PageContent, BrowserError>;

    /// Captures a screenshot of the current page as PNG bytes.
    async fn capture(&self) -> Result<Vec<u8>, BrowserError>;

    /// Releases the underlying browser. Idempotent.
    async fn close(&self) -> Result<(), BrowserError>;
}
