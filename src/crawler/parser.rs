//! HTML parsing: hyperlink extraction
//!
//! This module pulls the raw `href` values out of a page body. It does no
//! resolution or scheme filtering; every href is handed to the resolution
//! engine afterwards, which is the single place where unsupported links get
//! dropped.

use scraper::{Html, Selector};

/// Extracts every `<a href>` value from an HTML document
///
/// Hrefs are returned in document order, duplicates included; deduplication
/// against the global graph is the record manager's job, not the parser's.
/// Empty hrefs are skipped.
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let mut hrefs = Vec::new();
    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                let href = href.trim();
                if !href.is_empty() {
                    hrefs.push(href.to_string());
                }
            }
        }
    }

    hrefs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_in_document_order() {
        let html = r#"
            <html><body>
                <a href="/first">One</a>
                <a href="https://example123.com/second">Two</a>
                <a href="third">Three</a>
            </body></html>
        "#;
        assert_eq!(
            extract_hrefs(html),
            vec!["/first", "https://example123.com/second", "third"]
        );
    }

    #[test]
    fn test_keeps_duplicates() {
        let html = r#"<html><body><a href="/page">A</a><a href="/page">B</a></body></html>"#;
        assert_eq!(extract_hrefs(html), vec!["/page", "/page"]);
    }

    #[test]
    fn test_skips_empty_and_anchorless() {
        let html = r#"<html><body><a href="">Empty</a><a>NoHref</a><a href="  ">Blank</a></body></html>"#;
        assert!(extract_hrefs(html).is_empty());
    }

    #[test]
    fn test_keeps_unsupported_schemes_for_the_resolver() {
        // Filtering happens downstream in the resolution engine
        let html = r#"<html><body><a href="mailto:a@b.com">Mail</a></body></html>"#;
        assert_eq!(extract_hrefs(html), vec!["mailto:a@b.com"]);
    }

    #[test]
    fn test_tolerates_malformed_html() {
        let html = "<html><body><a href='/x'>unterminated";
        assert_eq!(extract_hrefs(html), vec!["/x"]);
    }

    #[test]
    fn test_no_links() {
        assert!(extract_hrefs("<html><body><p>plain</p></body></html>").is_empty());
    }
}
