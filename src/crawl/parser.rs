//! HTML extraction: title, outgoing links, and visible text.
//!
//! Parsing is lenient; malformed markup never aborts a crawl. The only
//! failure mode is an unparseable base URL, which makes link resolution
//! impossible.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

const TITLE_SELECTOR_STR: &str = "title";
const ANCHOR_SELECTOR_STR: &str = "a[href]";

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_static_selector(TITLE_SELECTOR_STR));

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_static_selector(ANCHOR_SELECTOR_STR));

fn parse_static_selector(selector: &str) -> Selector {
    Selector::parse(selector).unwrap_or_else(|e| {
        log::error!("Failed to parse selector '{}': {}", selector, e);
        // Fall back to a known-valid selector that matches nothing so
        // extraction degrades instead of panicking.
        Selector::parse("*:not(*)").expect("fallback selector is valid")
    })
}

/// Extraction result for one fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    /// Trimmed text of the first `<title>` element, empty if absent.
    pub title: String,
    /// Absolute http/https links in order of appearance. Duplicates are
    /// kept; the visited set deduplicates later.
    pub links: Vec<String>,
    /// All text nodes joined by single spaces, outer-trimmed.
    pub text_content: String,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

/// Parses `body` as HTML and extracts title, links resolved against
/// `base_url`, and the page's text content.
pub fn parse_page(base_url: &str, body: &str) -> Result<ParsedPage, ParseError> {
    let base = Url::parse(base_url)?;
    let document = Html::parse_document(body);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let mut links = Vec::new();
    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() {
            continue;
        }
        let Ok(resolved) = base.join(href) else {
            continue;
        };
        if matches!(resolved.scheme(), "http" | "https") {
            links.push(resolved.into());
        }
    }

    let text_content = document
        .root_element()
        .text()
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    Ok(ParsedPage {
        title,
        links,
        text_content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_extracts_title() {
        let page = parse_page(
            "http://example.test/",
            "<html><head><title>  Hello World </title></head><body></body></html>",
        )
        .expect("parse");
        assert_eq!(page.title, "Hello World");
    }

    #[test]
    fn test_parse_page_missing_title_is_empty() {
        let page = parse_page("http://example.test/", "<html><body><p>hi</p></body></html>")
            .expect("parse");
        assert_eq!(page.title, "");
    }

    #[test]
    fn test_parse_page_resolves_relative_links() {
        let page = parse_page(
            "http://example.test/dir/page",
            r#"<a href="/abs">a</a><a href="rel">b</a><a href="http://other.test/x">c</a>"#,
        )
        .expect("parse");
        assert_eq!(
            page.links,
            vec![
                "http://example.test/abs",
                "http://example.test/dir/rel",
                "http://other.test/x",
            ]
        );
    }

    #[test]
    fn test_parse_page_filters_non_http_schemes() {
        let page = parse_page(
            "http://example.test/",
            r#"<a href="mailto:x@example.test">m</a>
               <a href="ftp://example.test/f">f</a>
               <a href="javascript:void(0)">j</a>
               <a href="https://example.test/ok">ok</a>"#,
        )
        .expect("parse");
        assert_eq!(page.links, vec!["https://example.test/ok"]);
    }

    #[test]
    fn test_parse_page_trims_href_and_skips_empty() {
        let page = parse_page(
            "http://example.test/",
            r#"<a href="  /padded  ">a</a><a href="   ">b</a><a href="">c</a>"#,
        )
        .expect("parse");
        assert_eq!(page.links, vec!["http://example.test/padded"]);
    }

    #[test]
    fn test_parse_page_keeps_duplicate_links_in_order() {
        let page = parse_page(
            "http://example.test/",
            r#"<a href="/a">1</a><a href="/b">2</a><a href="/a">3</a>"#,
        )
        .expect("parse");
        assert_eq!(
            page.links,
            vec![
                "http://example.test/a",
                "http://example.test/b",
                "http://example.test/a",
            ]
        );
    }

    #[test]
    fn test_parse_page_text_content_joined_by_single_spaces() {
        let page = parse_page(
            "http://example.test/",
            "<html><head><title>T</title></head><body><h1>Heading</h1>\n  <p>one <b>two</b>\tthree</p></body></html>",
        )
        .expect("parse");
        assert_eq!(page.text_content, "T Heading one two three");
    }

    #[test]
    fn test_parse_page_tolerates_malformed_html() {
        let page = parse_page(
            "http://example.test/",
            "<html><body><p>unclosed<a href='/x'>link</body>",
        )
        .expect("parse");
        assert_eq!(page.links, vec!["http://example.test/x"]);
        assert!(page.text_content.contains("unclosed"));
    }

    #[test]
    fn test_parse_page_invalid_base_url_fails() {
        assert!(parse_page("not a url", "<html></html>").is_err());
    }
}
