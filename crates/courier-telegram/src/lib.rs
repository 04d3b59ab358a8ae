// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram transport for the Courier relay agent.
//!
//! Long polling via teloxide feeds an mpsc channel of [`InboundEvent`]s;
//! replies go out chunked to the Telegram message size limit, with an HTML
//! parse-mode attempt and plain-text fallback for rich replies.

pub mod chunker;

use chrono::Utc;
use courier_core::error::CourierError;
use courier_core::types::{InboundEvent, OutboundReply};
use teloxide::prelude::*;
use teloxide::types::{ChatAction, ChatKind, ParseMode, Recipient};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Telegram transport: one long-polling task, one inbound queue.
pub struct TelegramTransport {
    bot: Bot,
    message_limit: usize,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundEvent>>,
    inbound_tx: mpsc::Sender<InboundEvent>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramTransport {
    /// Creates the transport. Requires `config.bot_token` to be set and
    /// non-empty.
    pub fn new(config: &courier_config::TelegramConfig) -> Result<Self, CourierError> {
        let token = config
            .bot_token
            .as_deref()
            .ok_or_else(|| CourierError::Config("telegram.bot_token is required".into()))?;
        if token.is_empty() {
            return Err(CourierError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            message_limit: config.message_limit,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Starts long polling. Idempotent: a second call is a no-op.
    pub fn connect(&mut self) {
        if self.polling_handle.is_some() {
            return;
        }

        let bot = self.bot.clone();
        let tx = self.inbound_tx.clone();

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let handler = Update::filter_message().endpoint(
                move |update: Update, msg: Message| {
                    let tx = tx.clone();
                    async move {
                        if let Some(event) = to_inbound_event(&update, &msg)
                            && tx.send(event).await.is_err()
                        {
                            warn!("inbound queue closed, dropping update");
                        }
                        respond(())
                    }
                },
            );

            Dispatcher::builder(bot, handler)
                .default_handler(|_| async {}) // Silently ignore non-message updates.
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
    }

    /// Stops the polling task. Queued events remain receivable.
    pub fn disconnect(&mut self) {
        if let Some(handle) = self.polling_handle.take() {
            handle.abort();
            info!("Telegram long polling stopped");
        }
    }

    /// Receives the next inbound event, or an error once the queue closes.
    pub async fn receive(&self) -> Result<InboundEvent, CourierError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| CourierError::Transport {
            message: "Telegram inbound queue closed".into(),
            source: None,
        })
    }

    /// Delivers a reply, splitting it into as many messages as the size
    /// limit requires. Rich replies go out as HTML; if Telegram rejects the
    /// markup, the chunk is retried as plain text.
    pub async fn send_reply(&self, reply: &OutboundReply) -> Result<(), CourierError> {
        let chat_id = Recipient::Id(ChatId(reply.chat_id));
        let chunks = chunker::split_message(&reply.text, self.message_limit);
        debug!(chat_id = reply.chat_id, chunks = chunks.len(), "sending reply");

        for chunk in chunks {
            if reply.rich_format {
                let result = self
                    .bot
                    .send_message(chat_id.clone(), &chunk)
                    .parse_mode(ParseMode::Html)
                    .await;
                match result {
                    Ok(_) => continue,
                    Err(err) => {
                        warn!(error = %err, "HTML send failed, retrying as plain text");
                    }
                }
            }
            self.bot
                .send_message(chat_id.clone(), &chunk)
                .await
                .map_err(|e| CourierError::Transport {
                    message: format!("failed to send message: {e}"),
                    source: Some(Box::new(e)),
                })?;
        }
        Ok(())
    }

    /// Shows the "typing…" indicator in the chat.
    pub async fn send_typing(&self, chat_id: i64) -> Result<(), CourierError> {
        self.bot
            .send_chat_action(ChatId(chat_id), ChatAction::Typing)
            .await
            .map_err(|e| CourierError::Transport {
                message: format!("failed to send typing indicator: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }
}

/// Converts a Telegram update into an [`InboundEvent`].
///
/// Only private-chat text messages with a sender qualify; everything else
/// (groups, stickers, channel posts) is ignored.
fn to_inbound_event(update: &Update, msg: &Message) -> Option<InboundEvent> {
    if !matches!(msg.chat.kind, ChatKind::Private(_)) {
        debug!(chat_id = msg.chat.id.0, "ignoring non-private message");
        return None;
    }

    let user = msg.from.as_ref()?;
    let text = msg.text()?;

    Some(InboundEvent {
        id: update.id.0 as i64,
        user_id: user.id.0 as i64,
        chat_id: msg.chat.id.0,
        text: text.to_string(),
        received_at: Utc::now(),
    })
}
