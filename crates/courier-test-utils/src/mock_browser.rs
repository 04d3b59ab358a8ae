// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock browser backend and session.
//!
//! Counts initializations and navigations so tests can assert lazy init
//! and single-flight behavior; navigation delay and page HTML are
//! configurable per backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use courier_core::error::BrowserError;
use courier_core::traits::{BrowserBackend, BrowserSession};
use courier_core::types::PageContent;

/// A browser backend producing [`MockBrowserSession`]s.
pub struct MockBrowser {
    inits: AtomicUsize,
    navigate_delay: Duration,
    page_html: Mutex<String>,
    init_error: Mutex<Option<String>>,
    sessions: Mutex<Vec<Arc<MockBrowserSession>>>,
}

impl MockBrowser {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inits: AtomicUsize::new(0),
            navigate_delay: Duration::ZERO,
            page_html: Mutex::new("<h1>Una noticia suficientemente larga</h1>".to_string()),
            init_error: Mutex::new(None),
            sessions: Mutex::new(Vec::new()),
        })
    }

    pub fn with_navigate_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            inits: AtomicUsize::new(0),
            navigate_delay: delay,
            page_html: Mutex::new("<h1>Una noticia suficientemente larga</h1>".to_string()),
            init_error: Mutex::new(None),
            sessions: Mutex::new(Vec::new()),
        })
    }

    /// Sets the HTML served by future navigations.
    pub fn set_page_html(&self, html: impl Into<String>) {
        *self.page_html.lock().expect("mock html mutex poisoned") = html.into();
    }

    /// Makes every subsequent `initialize` fail with the given message.
    pub fn fail_init(&self, message: impl Into<String>) {
        *self.init_error.lock().expect("mock init mutex poisoned") = Some(message.into());
    }

    pub fn inits(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }

    /// Sessions handed out so far, in creation order.
    pub fn sessions(&self) -> Vec<Arc<MockBrowserSession>> {
        self.sessions
            .lock()
            .expect("mock sessions mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl BrowserBackend for MockBrowser {
    async fn initialize(&self) -> Result<Arc<dyn BrowserSession>, BrowserError> {
        if let Some(message) = self
            .init_error
            .lock()
            .expect("mock init mutex poisoned")
            .clone()
        {
            return Err(BrowserError::Init(message));
        }

        self.inits.fetch_add(1, Ordering::SeqCst);
        let session = Arc::new(MockBrowserSession {
            navigate_delay: self.navigate_delay,
            page_html: self.page_html.lock().expect("mock html mutex poisoned").clone(),
            navigations: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
        });
        self.sessions
            .lock()
            .expect("mock sessions mutex poisoned")
            .push(session.clone());
        Ok(session)
    }
}

/// A session serving a fixed page.
pub struct MockBrowserSession {
    navigate_delay: Duration,
    page_html: String,
    navigations: AtomicUsize,
    closes: AtomicUsize,
}

impl MockBrowserSession {
    pub fn navigations(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrowserSession for MockBrowserSession {
    async fn navigate(&self, url: &str) -> Result<PageContent, BrowserError> {
        if !self.navigate_delay.is_zero() {
            tokio::time::sleep(self.navigate_delay).await;
        }
        self.navigations.fetch_add(1, Ordering::SeqCst);
        Ok(PageContent {
            url: url.to_string(),
            title: "mock page".into(),
            html: self.page_html.clone(),
            text: "mock page text".into(),
        })
    }

    async fn capture(&self) -> Result<Vec<u8>, BrowserError> {
        Ok(vec![0x89, 0x50, 0x4e, 0x47])
    }

    async fn close(&self) -> Result<(), BrowserError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
