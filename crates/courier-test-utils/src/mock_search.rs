// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock search backend returning canned hits.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use courier_core::error::BackendError;
use courier_core::traits::SearchBackend;
use courier_core::types::SearchHit;

/// A search backend serving a fixed result set.
pub struct MockSearch {
    available: AtomicBool,
    hits: Mutex<Vec<SearchHit>>,
    last_query: Mutex<Option<String>>,
}

impl MockSearch {
    pub fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
            hits: Mutex::new(Vec::new()),
            last_query: Mutex::new(None),
        }
    }

    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        let mock = Self::new();
        *mock.hits.lock().expect("mock hits mutex poisoned") = hits;
        mock
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// The query from the most recent `search` call.
    pub fn last_query(&self) -> Option<String> {
        self.last_query
            .lock()
            .expect("mock query mutex poisoned")
            .clone()
    }
}

impl Default for MockSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchBackend for MockSearch {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, BackendError> {
        *self.last_query.lock().expect("mock query mutex poisoned") = Some(query.to_string());
        Ok(self.hits.lock().expect("mock hits mutex poisoned").clone())
    }
}
