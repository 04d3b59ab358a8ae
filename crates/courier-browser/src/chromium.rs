// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chromium-backed browser sessions via `headless_chrome`.
//!
//! The CDP client is synchronous, so every browser call runs inside
//! `spawn_blocking`. One session owns one browser process with a single tab;
//! the process is released on [`close`](courier_core::traits::BrowserSession::close)
//! or when the session is dropped.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use courier_config::BrowserConfig;
use courier_core::error::BrowserError;
use courier_core::traits::{BrowserBackend, BrowserSession};
use courier_core::types::PageContent;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use tracing::{debug, info};

/// Columns used when rendering page HTML to readable text.
const TEXT_RENDER_WIDTH: usize = 80;

/// Launches Chromium processes for the session manager.
#[derive(Debug, Clone)]
pub struct ChromiumBackend {
    headless: bool,
    page_text_limit: usize,
}

impl ChromiumBackend {
    pub fn new(config: &BrowserConfig) -> Self {
        Self {
            headless: config.headless,
            page_text_limit: config.page_text_limit,
        }
    }
}

#[async_trait]
impl BrowserBackend for ChromiumBackend {
    async fn initialize(&self) -> Result<Arc<dyn BrowserSession>, BrowserError> {
        let headless = self.headless;
        let page_text_limit = self.page_text_limit;

        let inner = tokio::task::spawn_blocking(move || {
            let options = LaunchOptions::default_builder()
                .headless(headless)
                .sandbox(false)
                .build()
                .map_err(|e| BrowserError::Init(format!("invalid launch options: {e}")))?;
            let browser = Browser::new(options)
                .map_err(|e| BrowserError::Init(format!("chromium launch failed: {e}")))?;
            let tab = browser
                .new_tab()
                .map_err(|e| BrowserError::Init(format!("opening tab failed: {e}")))?;
            Ok::<_, BrowserError>(SessionInner {
                _browser: browser,
                tab,
            })
        })
        .await
        .map_err(|e| BrowserError::Init(format!("launch task failed: {e}")))??;

        info!("chromium session initialized");
        Ok(Arc::new(ChromiumSession {
            inner: Mutex::new(Some(inner)),
            page_text_limit,
        }))
    }
}

struct SessionInner {
    // Kept alive for the tab; the process exits when this is dropped.
    _browser: Browser,
    tab: Arc<Tab>,
}

/// One live Chromium process with a single reusable tab.
pub struct ChromiumSession {
    inner: Mutex<Option<SessionInner>>,
    page_text_limit: usize,
}

impl ChromiumSession {
    fn tab(&self) -> Result<Arc<Tab>, BrowserError> {
        self.inner
            .lock()
            .expect("chromium session mutex poisoned")
            .as_ref()
            .map(|inner| inner.tab.clone())
            .ok_or(BrowserError::NoActiveSession)
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&self, url: &str) -> Result<PageContent, BrowserError> {
        let tab = self.tab()?;
        let url = url.to_string();
        let page_text_limit = self.page_text_limit;

        tokio::task::spawn_blocking(move || {
            tab.navigate_to(&url)
                .map_err(|e| BrowserError::Navigation(format!("navigate to {url} failed: {e}")))?;
            tab.wait_until_navigated()
                .map_err(|e| BrowserError::Navigation(format!("page load failed: {e}")))?;

            let html = tab
                .get_content()
                .map_err(|e| BrowserError::Navigation(format!("reading page failed: {e}")))?;
            let title = tab.get_title().unwrap_or_default();
            let final_url = tab.get_url();

            let rendered = html2text::from_read(html.as_bytes(), TEXT_RENDER_WIDTH)
                .unwrap_or_else(|_| html.clone());
            let text: String = rendered.chars().take(page_text_limit).collect();

            debug!(url = %final_url, title = %title, "page captured");
            Ok(PageContent {
                url: final_url,
                title,
                html,
                text,
            })
        })
        .await
        .map_err(|e| BrowserError::Navigation(format!("navigation task failed: {e}")))?
    }

    async fn capture(&self) -> Result<Vec<u8>, BrowserError> {
        let tab = self.tab()?;

        tokio::task::spawn_blocking(move || {
            tab.capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
                .map_err(|e| BrowserError::Capture(format!("screenshot failed: {e}")))
        })
        .await
        .map_err(|e| BrowserError::Capture(format!("capture task failed: {e}")))?
    }

    async fn close(&self) -> Result<(), BrowserError> {
        let inner = self
            .inner
            .lock()
            .expect("chromium session mutex poisoned")
            .take();

        // Already closed: nothing to do.
        let Some(inner) = inner else { return Ok(()) };

        tokio::task::spawn_blocking(move || {
            drop(inner);
        })
        .await
        .map_err(|e| BrowserError::Capture(format!("close task failed: {e}")))?;

        info!("chromium session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Launching a real Chromium is out of scope for unit tests; the manager
    // covers the session lifecycle against mocks. Here we only pin the
    // config plumbing.

    #[test]
    fn backend_reads_config() {
        let config = BrowserConfig {
            headless: false,
            navigation_timeout_secs: 5,
            page_text_limit: 123,
        };
        let backend = ChromiumBackend::new(&config);
        assert!(!backend.headless);
        assert_eq!(backend.page_text_limit, 123);
    }

    #[tokio::test]
    async fn closed_session_rejects_navigation() {
        let session = ChromiumSession {
            inner: Mutex::new(None),
            page_text_limit: 2000,
        };
        let err = session.navigate("https://example.com").await.unwrap_err();
        assert!(matches!(err, BrowserError::NoActiveSession));

        let err = session.capture().await.unwrap_err();
        assert!(matches!(err, BrowserError::NoActiveSession));

        // Close on an already-closed session is a no-op.
        session.close().await.unwrap();
        session.close().await.unwrap();
    }
}
