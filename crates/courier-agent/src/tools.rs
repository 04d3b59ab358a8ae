// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Direct tool paths: answers produced without a completion backend.
//!
//! All user-facing strings are Spanish, matching the agent's audience.

use std::time::Duration;

use chrono::{Datelike, NaiveDate, Utc, Weekday};
use courier_browser::scrape;
use courier_browser::SessionManager;
use courier_core::error::{BackendError, BrowserError};
use courier_core::traits::SearchBackend;
use tracing::{debug, warn};

/// Front page scraped for headlines.
pub const FRONT_PAGE_URL: &str = "https://elpais.com";

/// Search query for the price tool.
const PRICE_QUERY: &str = "precio Bitcoin hoy USD";

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "lunes",
        Weekday::Tue => "martes",
        Weekday::Wed => "miércoles",
        Weekday::Thu => "jueves",
        Weekday::Fri => "viernes",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

/// Formats a date the long Spanish way: "lunes, 1 de septiembre de 2025".
pub fn spanish_date(date: NaiveDate) -> String {
    format!(
        "{}, {} de {} de {}",
        weekday_name(date.weekday()),
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Reply for the date tool, using today's date.
pub fn date_reply() -> String {
    format!("Hoy es {}. 📅", spanish_date(Utc::now().date_naive()))
}

/// Reply for the price tool: first organic search hit for the Bitcoin price.
pub async fn bitcoin_price(search: &dyn SearchBackend) -> Result<String, BackendError> {
    let hits = search.search(PRICE_QUERY).await?;

    let Some(hit) = hits.first() else {
        return Ok("No he podido encontrar el precio de Bitcoin en este momento.".to_string());
    };

    debug!(link = %hit.link, "price hit selected");
    Ok(format!("💰 {}\n\nFuente: {}", hit.snippet, hit.link))
}

/// Outcome of the headline scrape.
#[derive(Debug)]
pub struct HeadlineReply {
    /// HTML-formatted reply for the transport's rich mode.
    pub html: String,
    /// Rendered page text when the browser served the page, already
    /// truncated to the configured limit. Stored as conversation context so
    /// follow-up questions can refer to the front page.
    pub page_text: Option<String>,
}

/// Fetches today's front-page headline from `front_page_url`.
///
/// The browser session is tried first; on any failure (or a page with no
/// usable heading) the scrape falls back to a plain HTTP GET. The reply is
/// HTML-formatted for the transport's rich mode.
pub async fn front_page_headline(
    sessions: &SessionManager,
    user_id: i64,
    front_page_url: &str,
    http_timeout: Duration,
) -> Result<HeadlineReply, BrowserError> {
    let (headline, page_text) = match sessions.navigate(user_id, front_page_url).await {
        Ok(page) => (scrape::extract_headline(&page.html), Some(page.text)),
        Err(err) => {
            warn!(error = %err, "browser scrape failed, trying plain HTTP");
            (None, None)
        }
    };

    let (headline, page_text) = match headline {
        Some(h) => (h, page_text),
        None => {
            let html = scrape::fetch_page(front_page_url, http_timeout).await?;
            let h = scrape::extract_headline(&html).ok_or_else(|| {
                BrowserError::Navigation("no headline found on the front page".into())
            })?;
            (h, None)
        }
    };

    Ok(HeadlineReply {
        html: format!(
            "📰 <b>{}</b>\n\n<a href=\"{}\">El País</a> · {}",
            escape_html(&headline),
            front_page_url,
            spanish_date(Utc::now().date_naive()),
        ),
        page_text,
    })
}

/// Escapes the characters Telegram's HTML parse mode treats specially.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
