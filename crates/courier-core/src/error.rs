// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Courier relay agent.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across Courier's components.
#[derive(Debug, Error)]
pub enum CourierError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport errors (connection failure, message delivery, rate limiting).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Terminal routing failure across all completion backends.
    #[error(transparent)]
    Router(#[from] RouterError),

    /// Browser automation session errors.
    #[error(transparent)]
    Browser(#[from] BrowserError),

    /// A single backend invocation failure.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors returned by a single completion or search backend invocation.
///
/// The variants mirror what the Dispatcher needs to distinguish: timeouts
/// and rate limits are transient, auth failures are configuration problems.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request exceeded its deadline.
    #[error("backend request timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// The API rejected our credentials (401/403).
    #[error("backend authentication failed: {0}")]
    AuthFailure(String),

    /// The API throttled us (429).
    #[error("backend rate limited: {0}")]
    RateLimited(String),

    /// Anything else: network faults, malformed responses, 5xx.
    #[error("backend error: {0}")]
    Unknown(String),
}

/// Terminal errors from the backend router's fallback chain.
#[derive(Debug, Error)]
pub enum RouterError {
    /// No backend passed its availability check.
    #[error("no completion backend is available")]
    NoBackendAvailable,

    /// Every available backend exhausted its retry budget.
    #[error("all completion backends failed, last error: {last}")]
    AllBackendsFailed {
        /// Number of backends attempted.
        attempted: usize,
        /// The last error observed before giving up.
        last: BackendError,
    },
}

/// Errors from the browser automation session manager.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Launching the browser or opening the page failed. The session slot
    /// is left uninitialized and may be retried on the next request.
    #[error("browser session initialization failed: {0}")]
    Init(String),

    /// Navigation exceeded its per-call timeout. The session stays active
    /// and reusable.
    #[error("navigation timed out after {duration:?}")]
    NavigationTimeout { duration: Duration },

    /// Navigation failed for a non-timeout reason.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// Screenshot capture failed.
    #[error("capture failed: {0}")]
    Capture(String),

    /// A capture was requested without an active session.
    #[error("no active browser session")]
    NoActiveSession,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_errors_into_courier_error() {
        let err: CourierError = BackendError::RateLimited("slow down".into()).into();
        assert!(matches!(err, CourierError::Backend(_)));
    }

    #[test]
    fn router_error_carries_last_cause() {
        let err = RouterError::AllBackendsFailed {
            attempted: 2,
            last: BackendError::Timeout {
                duration: Duration::from_secs(30),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("all completion backends failed"));
        assert!(msg.contains("30s"));
    }

    #[test]
    fn navigation_timeout_is_distinguishable() {
        let err = BrowserError::NavigationTimeout {
            duration: Duration::from_secs(30),
        };
        assert!(matches!(err, BrowserError::NavigationTimeout { .. }));
        assert!(!matches!(err, BrowserError::NoActiveSession));
    }
}
