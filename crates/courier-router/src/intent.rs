// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic tool-intent classification.
//!
//! Pure keyword matching over the message text, in the user's language
//! (Spanish). Keyword sets combine with AND within an intent; intents are
//! checked in fixed priority order and the first match wins. Unmatched text
//! falls through to LLM generation. This is deliberately a heuristic, not an
//! intent model: a message that merely mentions "hoy" and "fecha" in passing
//! will trigger the date tool.

/// A recognized direct-tool intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolIntent {
    /// "¿Qué día es hoy?", answered locally with the formatted date.
    DateQuery,
    /// Front-page headline request, served by the browser scrape.
    HeadlineQuery,
    /// Bitcoin price request, served by the search backend.
    PriceQuery,
}

impl std::fmt::Display for ToolIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolIntent::DateQuery => write!(f, "date"),
            ToolIntent::HeadlineQuery => write!(f, "headline"),
            ToolIntent::PriceQuery => write!(f, "price"),
        }
    }
}

/// Day-words for the date intent; any one of these AND a "hoy" word.
const DATE_WORDS: &[&str] = &["fecha", "dia", "día"];

/// Headline intent keywords; any single match triggers.
const HEADLINE_WORDS: &[&str] = &["titular", "periodico", "periódico", "elpais", "el pais"];

/// Price intent requires a coin word and a price word.
const PRICE_COIN_WORDS: &[&str] = &["bitcoin", "btc"];
const PRICE_WORDS: &[&str] = &["precio", "price"];

/// Classifies a message into a tool intent, if any.
///
/// Case-insensitive substring matching; intents are tried in fixed priority
/// order (date, headline, price).
pub fn classify(text: &str) -> Option<ToolIntent> {
    let normalized = text.to_lowercase();

    if DATE_WORDS.iter().any(|w| normalized.contains(w)) && normalized.contains("hoy") {
        return Some(ToolIntent::DateQuery);
    }

    if HEADLINE_WORDS.iter().any(|w| normalized.contains(w)) {
        return Some(ToolIntent::HeadlineQuery);
    }

    if PRICE_COIN_WORDS.iter().any(|w| normalized.contains(w))
        && PRICE_WORDS.iter().any(|w| normalized.contains(w))
    {
        return Some(ToolIntent::PriceQuery);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_requires_both_word_sets() {
        assert_eq!(classify("¿qué fecha es hoy?"), Some(ToolIntent::DateQuery));
        assert_eq!(classify("que dia es HOY"), Some(ToolIntent::DateQuery));
        assert_eq!(classify("¿Qué día es hoy?"), Some(ToolIntent::DateQuery));
        // A day-word alone is not enough.
        assert_eq!(classify("la fecha de mi cumpleaños"), None);
        assert_eq!(classify("hoy hace calor"), None);
    }

    #[test]
    fn headline_matches_any_keyword() {
        assert_eq!(
            classify("dame el titular principal"),
            Some(ToolIntent::HeadlineQuery)
        );
        assert_eq!(
            classify("noticias de El País"),
            Some(ToolIntent::HeadlineQuery)
        );
        assert_eq!(
            classify("que dice el periodico"),
            Some(ToolIntent::HeadlineQuery)
        );
        assert_eq!(classify("elpais.com"), Some(ToolIntent::HeadlineQuery));
    }

    #[test]
    fn price_requires_coin_and_price_word() {
        assert_eq!(
            classify("¿cuál es el precio de bitcoin?"),
            Some(ToolIntent::PriceQuery)
        );
        assert_eq!(classify("BTC price?"), Some(ToolIntent::PriceQuery));
        assert_eq!(classify("me gusta bitcoin"), None);
        assert_eq!(classify("el precio del pan"), None);
    }

    #[test]
    fn priority_order_first_match_wins() {
        // Mentions both a date intent and a headline keyword; date wins.
        assert_eq!(
            classify("¿qué día es hoy según el periódico?"),
            Some(ToolIntent::DateQuery)
        );
    }

    #[test]
    fn ordinary_text_falls_through() {
        assert_eq!(classify("hola, ¿cómo estás?"), None);
        assert_eq!(classify(""), None);
        assert_eq!(classify("explícame rust"), None);
    }

    #[test]
    fn false_positive_on_incidental_keywords_is_by_design() {
        // Keyword semantics are preserved exactly: incidental mentions match.
        assert_eq!(
            classify("ayer hablamos de la fecha, hoy de otra cosa"),
            Some(ToolIntent::DateQuery)
        );
    }
}
