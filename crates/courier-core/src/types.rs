// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Courier workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Role of a conversation turn, in the order backends expect it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single turn in a conversation, replayed to backends verbatim and in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    /// Creates a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Creates a system turn.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// An inbound chat event as delivered by the transport.
///
/// Identity is `id` (the Telegram update id): two events with the same `id`
/// are the same delivery attempt and must not be processed twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Transport-assigned unique update identifier.
    pub id: i64,
    /// Sender's user id. Conversation state is keyed by this.
    pub user_id: i64,
    /// Chat the reply should go back to.
    pub chat_id: i64,
    /// Message text, including any leading `/command`.
    pub text: String,
    /// When the transport handed us the event.
    pub received_at: DateTime<Utc>,
}

/// An outbound reply produced by the Dispatcher.
///
/// The transport is responsible for chunking `text` to its message size
/// limit before delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReply {
    /// Destination chat.
    pub chat_id: i64,
    /// Full reply text; may exceed the transport's per-message limit.
    pub text: String,
    /// Whether the text carries rich formatting (HTML bold/links).
    pub rich_format: bool,
}

impl OutboundReply {
    /// Creates a plain-text reply.
    pub fn plain(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            rich_format: false,
        }
    }

    /// Creates a reply with HTML formatting enabled.
    pub fn rich(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            rich_format: true,
        }
    }
}

/// One organic result from the search backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Content extracted from a navigated page.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// Final URL after navigation.
    pub url: String,
    /// Document title.
    pub title: String,
    /// Raw HTML of the page.
    pub html: String,
    /// Readable text rendering of the page, truncated by the backend.
    pub text: String,
}
