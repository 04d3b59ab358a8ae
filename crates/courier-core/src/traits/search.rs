// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search backend trait for real-time web search providers (Serper).

use async_trait::async_trait;

use crate::error::BackendError;
use crate::types::SearchHit;

/// A web search backend returning organic results for a query.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Whether this backend is configured (credential present).
    fn is_available(&self) -> bool;

    /// Runs a search and returns organic results, possibly empty.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, BackendError>;
}
