// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prioritized fallback across completion backends.
//!
//! The router holds an ordered chain of backends. For each request it
//! snapshots availability once, then walks the available backends in
//! ascending priority order. Every candidate gets a fresh retry budget with
//! linear backoff after each failed attempt; the chain only advances after a
//! candidate exhausts its budget. The final error reports how many backends
//! were attempted and the last failure observed.

use std::sync::Arc;
use std::time::Duration;

use courier_core::error::{BackendError, RouterError};
use courier_core::traits::CompletionBackend;
use courier_core::types::ConversationTurn;
use tracing::{debug, info, warn};

/// Ordered fallback chain over [`CompletionBackend`] implementations.
pub struct BackendRouter {
    backends: Vec<Arc<dyn CompletionBackend>>,
    max_retries: u32,
    retry_delay: Duration,
}

impl BackendRouter {
    /// Builds a router over `backends` with `max_retries` attempts per
    /// backend and a base `retry_delay` for linear backoff.
    ///
    /// Backends are sorted by ascending [`priority`](CompletionBackend::priority)
    /// at construction; registration order breaks ties.
    pub fn new(
        mut backends: Vec<Arc<dyn CompletionBackend>>,
        max_retries: u32,
        retry_delay: Duration,
    ) -> Self {
        backends.sort_by_key(|b| b.priority());
        Self {
            backends,
            max_retries,
            retry_delay,
        }
    }

    /// Names of registered backends in fallback order.
    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Names of the backends currently passing their availability check.
    pub fn available_backend_names(&self) -> Vec<&str> {
        self.backends
            .iter()
            .filter(|b| b.is_available())
            .map(|b| b.name())
            .collect()
    }

    /// Runs the fallback chain for one completion request.
    ///
    /// Availability is resolved once at entry; a backend that becomes
    /// available mid-request is not consulted until the next call. Returns
    /// the first successful completion, [`RouterError::NoBackendAvailable`]
    /// if the snapshot is empty, or [`RouterError::AllBackendsFailed`] once
    /// every candidate's retry budget is spent.
    pub async fn respond(
        &self,
        turns: &[ConversationTurn],
        system_prompt: Option<&str>,
    ) -> Result<String, RouterError> {
        let candidates: Vec<&Arc<dyn CompletionBackend>> = self
            .backends
            .iter()
            .filter(|b| b.is_available())
            .collect();

        if candidates.is_empty() {
            warn!("no completion backend is available");
            return Err(RouterError::NoBackendAvailable);
        }

        let mut attempted = 0usize;
        let mut last_error: Option<BackendError> = None;

        for backend in candidates {
            attempted += 1;
            for attempt in 1..=self.max_retries {
                debug!(
                    backend = backend.name(),
                    attempt,
                    max = self.max_retries,
                    "requesting completion"
                );
                match backend.complete(turns, system_prompt).await {
                    Ok(text) => {
                        info!(backend = backend.name(), attempt, "completion succeeded");
                        return Ok(text);
                    }
                    Err(err) => {
                        warn!(
                            backend = backend.name(),
                            attempt,
                            error = %err,
                            "completion attempt failed"
                        );
                        last_error = Some(err);
                        // Linear backoff after every failed attempt: delay,
                        // 2*delay, ... including the last one before falling
                        // back to the next candidate.
                        tokio::time::sleep(self.retry_delay * attempt).await;
                    }
                }
            }
            debug!(
                backend = backend.name(),
                "retry budget exhausted, falling back"
            );
        }

        Err(RouterError::AllBackendsFailed {
            attempted,
            last: last_error.unwrap_or_else(|| {
                BackendError::Unknown("no attempt recorded".to_string())
            }),
        })
    }
}

impl std::fmt::Debug for BackendRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRouter")
            .field("backends", &self.backend_names())
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}
