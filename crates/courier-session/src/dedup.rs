// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded recency window for inbound update deduplication.
//!
//! The transport delivers updates at-least-once; this window rejects replays
//! of the most recently seen update ids. Eviction is strict FIFO by
//! insertion order; re-seeing an id does not refresh its position. An id
//! evicted past the window and redelivered later is accepted as new, which
//! keeps the memory bound.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use tracing::debug;

/// Fixed-capacity FIFO set of recently processed update ids.
#[derive(Debug)]
struct DedupWindow {
    capacity: usize,
    seen: HashSet<i64>,
    order: VecDeque<i64>,
}

impl DedupWindow {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            seen: HashSet::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Returns `true` the first time `id` is seen (and records it),
    /// `false` while it remains in the window.
    fn accept(&mut self, id: i64) -> bool {
        if self.seen.contains(&id) {
            return false;
        }

        self.seen.insert(id);
        self.order.push_back(id);

        if self.order.len() > self.capacity
            && let Some(oldest) = self.order.pop_front()
        {
            self.seen.remove(&oldest);
        }

        true
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

/// Shared deduplication gate for the Dispatcher.
///
/// Contract: [`accept`](Self::accept) returns `true` exactly once per id
/// until capacity eviction. Accepted ids have the side effect of being
/// recorded; rejected ids have no side effects at all.
#[derive(Debug)]
pub struct Deduplicator {
    inner: Mutex<DedupWindow>,
}

impl Deduplicator {
    /// Creates a deduplicator tracking the last `capacity` update ids.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(DedupWindow::new(capacity)),
        }
    }

    /// Accepts an update id, returning whether it should be processed.
    pub fn accept(&self, id: i64) -> bool {
        let accepted = self
            .inner
            .lock()
            .expect("dedup window mutex poisoned")
            .accept(id);
        if !accepted {
            debug!(update_id = id, "duplicate update ignored");
        }
        accepted
    }

    /// Number of ids currently tracked.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("dedup window mutex poisoned").len()
    }

    /// Whether no ids are tracked yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
