// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user browser session lifecycle.
//!
//! Each user owns one session slot. Initialization is lazy (first navigation
//! pays the launch cost) and single-flight: the slot's async mutex is held
//! for the whole operation, so concurrent requests from the same user
//! serialize and never launch two browsers. A navigation timeout does not
//! tear the session down; the browser stays active for the next request.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use courier_core::error::BrowserError;
use courier_core::traits::{BrowserBackend, BrowserSession};
use courier_core::types::PageContent;
use tracing::{debug, info, warn};

enum SlotState {
    Uninitialized,
    Active(Arc<dyn BrowserSession>),
    Closed,
}

struct UserSlot {
    state: tokio::sync::Mutex<SlotState>,
    last_used_at: std::sync::Mutex<Option<Instant>>,
}

impl UserSlot {
    fn touch(&self) {
        *self
            .last_used_at
            .lock()
            .expect("last_used_at mutex poisoned") = Some(Instant::now());
    }
}

/// Manages one lazily-initialized browser session per user.
pub struct SessionManager {
    backend: Arc<dyn BrowserBackend>,
    navigation_timeout: Duration,
    slots: std::sync::Mutex<HashMap<i64, Arc<UserSlot>>>,
}

impl SessionManager {
    pub fn new(backend: Arc<dyn BrowserBackend>, navigation_timeout: Duration) -> Self {
        Self {
            backend,
            navigation_timeout,
            slots: std::sync::Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, user_id: i64) -> Arc<UserSlot> {
        self.slots
            .lock()
            .expect("session slot map mutex poisoned")
            .entry(user_id)
            .or_insert_with(|| {
                Arc::new(UserSlot {
                    state: tokio::sync::Mutex::new(SlotState::Uninitialized),
                    last_used_at: std::sync::Mutex::new(None),
                })
            })
            .clone()
    }

    /// Returns the slot's active session, launching one if needed.
    ///
    /// On launch failure the slot stays uninitialized, so the next request
    /// retries from scratch.
    async fn ensure_active(
        &self,
        user_id: i64,
        state: &mut SlotState,
    ) -> Result<Arc<dyn BrowserSession>, BrowserError> {
        if let SlotState::Active(session) = state {
            return Ok(session.clone());
        }

        info!(user_id, "launching browser session");
        let session = self.backend.initialize().await?;
        *state = SlotState::Active(session.clone());
        Ok(session)
    }

    /// Navigates the user's session to `url`, initializing it first if the
    /// slot is uninitialized or closed.
    ///
    /// Navigation is bounded by the configured timeout; on expiry the call
    /// fails with [`BrowserError::NavigationTimeout`] but the session stays
    /// active and reusable.
    pub async fn navigate(&self, user_id: i64, url: &str) -> Result<PageContent, BrowserError> {
        let slot = self.slot(user_id);
        let mut state = slot.state.lock().await;
        let session = self.ensure_active(user_id, &mut state).await?;

        debug!(user_id, url, "navigating");
        match tokio::time::timeout(self.navigation_timeout, session.navigate(url)).await {
            Ok(result) => {
                slot.touch();
                result
            }
            Err(_) => {
                warn!(user_id, url, "navigation timed out, session kept alive");
                Err(BrowserError::NavigationTimeout {
                    duration: self.navigation_timeout,
                })
            }
        }
    }

    /// Captures a screenshot of the user's current page.
    ///
    /// Unlike navigation this never launches a session: with no active page
    /// there is nothing to capture.
    pub async fn capture(&self, user_id: i64) -> Result<Vec<u8>, BrowserError> {
        let slot = self.slot(user_id);
        let state = slot.state.lock().await;
        match &*state {
            SlotState::Active(session) => {
                let png = session.capture().await?;
                slot.touch();
                Ok(png)
            }
            SlotState::Uninitialized | SlotState::Closed => Err(BrowserError::NoActiveSession),
        }
    }

    /// When the user's session last completed a navigation or capture.
    pub fn last_used_at(&self, user_id: i64) -> Option<Instant> {
        let slot = self.slot(user_id);
        let at = *slot
            .last_used_at
            .lock()
            .expect("last_used_at mutex poisoned");
        at
    }

    /// Closes the user's session. A no-op for slots that never initialized
    /// or were already closed.
    pub async fn close(&self, user_id: i64) -> Result<(), BrowserError> {
        let slot = self.slot(user_id);
        let mut state = slot.state.lock().await;
        if let SlotState::Active(session) = &*state {
            session.close().await?;
            info!(user_id, "browser session closed");
        }
        *state = SlotState::Closed;
        Ok(())
    }

    /// Closes every active session. Best-effort: a failing close is logged
    /// and the sweep continues.
    pub async fn close_all(&self) {
        let slots: Vec<(i64, Arc<UserSlot>)> = self
            .slots
            .lock()
            .expect("session slot map mutex poisoned")
            .iter()
            .map(|(id, slot)| (*id, slot.clone()))
            .collect();

        for (user_id, slot) in slots {
            let mut state = slot.state.lock().await;
            if let SlotState::Active(session) = &*state
                && let Err(err) = session.close().await
            {
                warn!(user_id, error = %err, "failed to close browser session");
            }
            *state = SlotState::Closed;
        }
        info!("all browser sessions closed");
    }
}
