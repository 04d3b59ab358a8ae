// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory session state for the Courier relay agent.
//!
//! This crate holds the two shared, mutated structures of the pipeline:
//! - [`Deduplicator`]: a bounded recency window of processed update ids
//! - [`ConversationStore`]: bounded per-user conversation history
//!
//! Both are pure data structures with no I/O; state is process-lifetime
//! only. Mutations are serialized with `std::sync::Mutex` (never held
//! across an await point).

pub mod dedup;
pub mod store;

pub use dedup::Deduplicator;
pub use store::ConversationStore;
