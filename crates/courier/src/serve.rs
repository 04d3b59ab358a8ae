// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring for `courier serve`: builds the backend stack from configuration
//! and runs the agent loop until a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use courier_agent::{AgentLoop, Dispatcher, shutdown};
use courier_browser::{ChromiumBackend, SessionManager};
use courier_config::CourierConfig;
use courier_core::error::CourierError;
use courier_core::traits::{CompletionBackend, SearchBackend};
use courier_gemini::GeminiBackend;
use courier_openrouter::OpenRouterBackend;
use courier_serper::SerperBackend;
use courier_telegram::TelegramTransport;
use courier_router::BackendRouter;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Runs the agent until SIGINT/SIGTERM.
pub async fn run(config: CourierConfig) -> Result<(), CourierError> {
    init_tracing(&config.agent.log_level);
    info!(
        agent = %config.agent.name,
        version = env!("CARGO_PKG_VERSION"),
        "starting courier"
    );

    let request_timeout = Duration::from_secs(config.router.request_timeout_secs);

    let gemini = GeminiBackend::new(&config.gemini, request_timeout)?;
    let openrouter = OpenRouterBackend::new(&config.openrouter, request_timeout)?;
    for (name, available) in [
        ("gemini", gemini.is_available()),
        ("openrouter", openrouter.is_available()),
    ] {
        if available {
            info!(backend = name, "completion backend configured");
        } else {
            warn!(backend = name, "api key missing, backend disabled");
        }
    }
    let backends: Vec<Arc<dyn CompletionBackend>> =
        vec![Arc::new(gemini), Arc::new(openrouter)];
    let router = BackendRouter::new(
        backends,
        config.router.max_retries,
        Duration::from_millis(config.router.retry_delay_ms),
    );

    let search: Arc<dyn SearchBackend> = Arc::new(SerperBackend::new(&config.serper)?);
    if !search.is_available() {
        warn!("serper api key missing, price tool disabled");
    }

    let browser = Arc::new(ChromiumBackend::new(&config.browser));
    let sessions = Arc::new(SessionManager::new(
        browser,
        Duration::from_secs(config.browser.navigation_timeout_secs),
    ));

    let transport = TelegramTransport::new(&config.telegram)?;
    let dispatcher = Dispatcher::new(
        router,
        search,
        sessions.clone(),
        &config.agent,
        &config.session,
    );

    let cancel = shutdown::install_signal_handler();
    let mut agent = AgentLoop::new(transport, dispatcher, sessions);
    agent.run(cancel).await
}

/// Initializes the tracing subscriber. `RUST_LOG` overrides the configured
/// level when set.
fn init_tracing(log_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
