// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion backend for deterministic testing.
//!
//! Results pop from a FIFO queue; an exhausted queue falls back to a default
//! reply. Call counts are recorded so tests can assert exact retry and
//! fallback behavior.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use courier_core::error::BackendError;
use courier_core::traits::CompletionBackend;
use courier_core::types::ConversationTurn;

/// A scripted completion backend.
pub struct MockCompletion {
    name: String,
    priority: u8,
    available: AtomicBool,
    results: Mutex<VecDeque<Result<String, BackendError>>>,
    calls: AtomicUsize,
    last_turns: Mutex<Vec<ConversationTurn>>,
}

impl MockCompletion {
    /// Creates an available backend with an empty script.
    pub fn new(name: impl Into<String>, priority: u8) -> Self {
        Self {
            name: name.into(),
            priority,
            available: AtomicBool::new(true),
            results: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            last_turns: Mutex::new(Vec::new()),
        }
    }

    /// Queues a successful reply.
    pub fn push_reply(&self, text: impl Into<String>) {
        self.results
            .lock()
            .expect("mock results mutex poisoned")
            .push_back(Ok(text.into()));
    }

    /// Queues a failure.
    pub fn push_error(&self, err: BackendError) {
        self.results
            .lock()
            .expect("mock results mutex poisoned")
            .push_back(Err(err));
    }

    /// Toggles availability.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of `complete` invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The conversation window passed to the most recent `complete` call.
    pub fn last_turns(&self) -> Vec<ConversationTurn> {
        self.last_turns
            .lock()
            .expect("mock turns mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl CompletionBackend for MockCompletion {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn complete(
        &self,
        turns: &[ConversationTurn],
        _system_prompt: Option<&str>,
    ) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_turns.lock().expect("mock turns mutex poisoned") = turns.to_vec();

        self.results
            .lock()
            .expect("mock results mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok("mock reply".to_string()))
    }
}
