// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded per-user conversation history.
//!
//! Each user owns an ordered log of turns, capped at `max_turns` with FIFO
//! eviction (oldest turns dropped first). The same bound applies to storage;
//! the smaller per-call context window sent to a backend is the caller's
//! policy, served by [`ConversationStore::context_window`].

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use courier_core::ConversationTurn;

/// Per-user sliding window of conversation turns.
///
/// Invariant: after every mutation, each user's log holds at most
/// `max_turns` turns, and the retained turns are exactly the most recent
/// ones in original order.
#[derive(Debug)]
pub struct ConversationStore {
    max_turns: usize,
    inner: Mutex<HashMap<i64, VecDeque<ConversationTurn>>>,
}

impl ConversationStore {
    /// Creates a store retaining at most `max_turns` turns per user.
    pub fn new(max_turns: usize) -> Self {
        Self {
            max_turns,
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Appends a turn to the user's log, evicting from the head if the
    /// bound would be exceeded.
    pub fn append(&self, user_id: i64, turn: ConversationTurn) {
        let mut map = self.inner.lock().expect("conversation store mutex poisoned");
        let turns = map.entry(user_id).or_default();
        turns.push_back(turn);
        while turns.len() > self.max_turns {
            turns.pop_front();
        }
    }

    /// Returns the user's current window, oldest first. Empty for unknown
    /// users.
    pub fn get(&self, user_id: i64) -> Vec<ConversationTurn> {
        self.inner
            .lock()
            .expect("conversation store mutex poisoned")
            .get(&user_id)
            .map(|turns| turns.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns the last `n` turns for the user, oldest first.
    ///
    /// This is the per-call context slice passed to completion backends; it
    /// does not affect what the store retains.
    pub fn context_window(&self, user_id: i64, n: usize) -> Vec<ConversationTurn> {
        self.inner
            .lock()
            .expect("conversation store mutex poisoned")
            .get(&user_id)
            .map(|turns| {
                turns
                    .iter()
                    .skip(turns.len().saturating_sub(n))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resets the user's log to empty.
    pub fn clear(&self, user_id: i64) {
        self.inner
            .lock()
            .expect("conversation store mutex poisoned")
            .remove(&user_id);
    }

    /// Number of users with at least one stored turn.
    pub fn user_count(&self) -> usize {
        self.inner
            .lock()
            .expect("conversation store mutex poisoned")
            .len()
    }
}
