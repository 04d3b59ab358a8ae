// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent loop and per-event pipeline for the Courier relay agent.
//!
//! The [`AgentLoop`] is the central coordinator that:
//! - Receives events from the Telegram transport
//! - Runs each one through the [`Dispatcher`] pipeline
//! - Delivers chunked replies back through the transport
//! - Handles graceful shutdown, closing browser sessions on the way out

pub mod commands;
pub mod dispatcher;
pub mod shutdown;
pub mod tools;

use std::sync::Arc;

use courier_browser::SessionManager;
use courier_core::error::CourierError;
use courier_telegram::TelegramTransport;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub use dispatcher::Dispatcher;

/// The main loop: transport in, dispatcher, transport out.
///
/// Events are handled sequentially; ordering within a conversation follows
/// delivery order by construction.
pub struct AgentLoop {
    transport: TelegramTransport,
    dispatcher: Dispatcher,
    sessions: Arc<SessionManager>,
}

impl AgentLoop {
    pub fn new(
        transport: TelegramTransport,
        dispatcher: Dispatcher,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            transport,
            dispatcher,
            sessions,
        }
    }

    /// Runs until the cancellation token triggers, then shuts down cleanly:
    /// polling stops, queued events are abandoned, and every browser
    /// session is closed.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), CourierError> {
        self.transport.connect();
        info!("agent loop running");

        loop {
            tokio::select! {
                event = self.transport.receive() => {
                    match event {
                        Ok(event) => self.handle_event(event).await,
                        Err(e) => {
                            error!(error = %e, "transport receive failed, stopping");
                            break;
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping agent loop");
                    break;
                }
            }
        }

        self.transport.disconnect();
        self.sessions.close_all().await;
        info!("agent loop stopped");
        Ok(())
    }

    /// Handles one event end to end. Failures are logged, never propagated:
    /// the loop must survive any single event.
    async fn handle_event(&self, event: courier_core::types::InboundEvent) {
        // The dedup gate comes first so duplicate deliveries have no
        // side effects, not even a typing indicator.
        if !self.dispatcher.accept(event.id) {
            debug!(update_id = event.id, "duplicate delivery dropped");
            return;
        }

        if let Err(e) = self.transport.send_typing(event.chat_id).await {
            warn!(error = %e, "typing indicator failed");
        }

        let reply = self.dispatcher.process(&event).await;
        if let Err(e) = self.transport.send_reply(&reply).await {
            error!(chat_id = reply.chat_id, error = %e, "reply delivery failed");
        }
    }
}
