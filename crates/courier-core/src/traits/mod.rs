// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend trait definitions for the Courier relay agent.
//!
//! All external collaborators are reachable only through these seams,
//! so the Dispatcher and Router can be tested against mocks.

pub mod browser;
pub mod completion;
pub mod search;

pub use browser::{BrowserBackend, BrowserSession};
pub use completion::CompletionBackend;
pub use search::SearchBackend;
