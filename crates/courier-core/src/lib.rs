// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Courier relay agent.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Courier workspace. Backend adapters and
//! the dispatcher build on the seams defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{BackendError, BrowserError, CourierError, RouterError};
pub use traits::{BrowserBackend, BrowserSession, CompletionBackend, SearchBackend};
pub use types::{ConversationTurn, InboundEvent, OutboundReply, PageContent, Role, SearchHit};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_construct() {
        let _config = CourierError::Config("test".into());
        let _transport = CourierError::Transport {
            message: "test".into(),
            source: None,
        };
        let _router = CourierError::Router(RouterError::NoBackendAvailable);
        let _browser = CourierError::Browser(BrowserError::NoActiveSession);
        let _internal = CourierError::Internal("test".into());
    }

    #[test]
    fn trait_objects_are_usable() {
        // The backend traits must stay object-safe: the router holds them
        // as `Arc<dyn CompletionBackend>`.
        fn _completion(_: &dyn CompletionBackend) {}
        fn _search(_: &dyn SearchBackend) {}
        fn _browser(_: &dyn BrowserBackend) {}
        fn _session(_: &dyn BrowserSession) {}
    }
}
