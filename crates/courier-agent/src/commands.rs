// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slash-command parsing.
//!
//! Commands are matched on the first whitespace-delimited token; a
//! `@botname` suffix (added by Telegram in some clients) is stripped before
//! matching. Unknown commands are not an error; they fall through to the
//! conversational pipeline like ordinary text.

/// A recognized bot command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Welcome message; also resets the conversation.
    Start,
    /// Capability listing.
    Help,
    /// Resets the conversation history.
    Clear,
    /// Uptime, version, and configured backends.
    Status,
    /// Bitcoin price via web search.
    Bitcoin,
    /// Front-page headline via browser scrape.
    News,
}

/// Parses the leading command token of a message, if any.
pub fn parse(text: &str) -> Option<Command> {
    let token = text.split_whitespace().next()?;
    if !token.starts_with('/') {
        return None;
    }
    let name = token[1..].split('@').next().unwrap_or("");

    match name.to_lowercase().as_str() {
        "start" => Some(Command::Start),
        "help" | "ayuda" => Some(Command::Help),
        "clear" | "borrar" => Some(Command::Clear),
        "status" | "estado" => Some(Command::Status),
        "bitcoin" => Some(Command::Bitcoin),
        "news" | "noticias" => Some(Command::News),
        _ => None,
    }
}
