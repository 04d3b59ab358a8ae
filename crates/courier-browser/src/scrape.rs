// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Headline extraction from newspaper front pages.
//!
//! Works on raw HTML from either the browser session or the plain HTTP
//! fallback. Candidate headlines come from `<h1>`/`<h2>` elements in
//! document order; the first one with enough text wins. Front pages put
//! navigation labels in headings too, so very short candidates are skipped.

use std::sync::LazyLock;
use std::time::Duration;

use courier_core::error::BrowserError;
use regex::Regex;
use tracing::debug;

/// Minimum character count for a heading to qualify as a headline.
const MIN_HEADLINE_LEN: usize = 15;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h[12][^>]*>(.*?)</h[12]>").expect("heading regex is valid")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").expect("tag regex is valid"));

/// Extracts the first plausible headline from front-page HTML.
pub fn extract_headline(html: &str) -> Option<String> {
    for captures in HEADING_RE.captures_iter(html) {
        let raw = captures.get(1).map(|m| m.as_str())?;
        let text = clean_fragment(raw);
        if text.chars().count() >= MIN_HEADLINE_LEN {
            debug!(headline = %text, "headline extracted");
            return Some(text);
        }
    }
    None
}

/// Strips nested tags, decodes common entities, and collapses whitespace.
fn clean_fragment(raw: &str) -> String {
    let stripped = TAG_RE.replace_all(raw, " ");
    let decoded = stripped
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#8217;", "'")
        .replace("&nbsp;", " ");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fetches a page over plain HTTP, used when the browser session fails.
pub async fn fetch_page(url: &str, timeout: Duration) -> Result<String, BrowserError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36")
        .build()
        .map_err(|e| BrowserError::Navigation(format!("failed to build HTTP client: {e}")))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| BrowserError::Navigation(format!("fetch of {url} failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(BrowserError::Navigation(format!(
            "fetch of {url} returned {status}"
        )));
    }

    response
        .text()
        .await
        .map_err(|e| BrowserError::Navigation(format!("reading body of {url} failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_long_heading() {
        let html = r#"
            <html><body>
            <h2>Secciones</h2>
            <h1>El Gobierno aprueba la reforma del mercado eléctrico</h1>
            <h2>Otra noticia cualquiera del día</h2>
            </body></html>
        "#;
        assert_eq!(
            extract_headline(html).as_deref(),
            Some("El Gobierno aprueba la reforma del mercado eléctrico")
        );
    }

    #[test]
    fn strips_nested_markup() {
        let html = r#"<h2><a href="/x"><b>Una noticia</b> con <i>formato</i> anidado</a></h2>"#;
        assert_eq!(
            extract_headline(html).as_deref(),
            Some("Una noticia con formato anidado")
        );
    }

    #[test]
    fn decodes_entities_and_collapses_whitespace() {
        let html = "<h1>\n  Guerra &amp; paz:   el d&#39;Hondt\n  explicado  </h1>";
        assert_eq!(
            extract_headline(html).as_deref(),
            Some("Guerra & paz: el d'Hondt explicado")
        );
    }

    #[test]
    fn short_navigation_labels_are_skipped() {
        let html = "<h2>Menú</h2><h2>Economía</h2>";
        assert_eq!(extract_headline(html), None);
    }

    #[test]
    fn no_headings_yields_none() {
        assert_eq!(extract_headline("<html><body><p>texto</p></body></html>"), None);
        assert_eq!(extract_headline(""), None);
    }

    #[test]
    fn matches_across_lines() {
        let html = "<h1 class=\"c\">\nTitular repartido\nen varias líneas del documento\n</h1>";
        assert_eq!(
            extract_headline(html).as_deref(),
            Some("Titular repartido en varias líneas del documento")
        );
    }

    #[tokio::test]
    async fn fetch_page_returns_body() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<h1>hola</h1>"))
            .mount(&server)
            .await;

        let body = fetch_page(&server.uri(), Duration::from_secs(5)).await.unwrap();
        assert_eq!(body, "<h1>hola</h1>");
    }

    #[tokio::test]
    async fn fetch_page_rejects_http_errors() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = fetch_page(&server.uri(), Duration::from_secs(5)).await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }
}
