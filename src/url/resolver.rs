use crate::url::UrlEntity;
use crate::UrlError;
use url::Url;

/// Checks whether `raw` is an absolute http(s) URL
///
/// Returns true iff `raw` parses as a URL with scheme `http` or `https` and
/// a non-empty host. Malformed input is never an error here; it simply
/// yields false.
///
/// # Examples
///
/// ```
/// use kumo::url::is_absolute_url;
///
/// assert!(is_absolute_url("https://example.com/page"));
/// assert!(!is_absolute_url("/page"));
/// assert!(!is_absolute_url("mailto:admin@example.com"));
/// ```
pub fn is_absolute_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(u) => (u.scheme() == "http" || u.scheme() == "https") && u.has_host(),
        Err(_) => false,
    }
}

/// Extracts the canonical page identity from any absolute http(s) URL
///
/// Returns `scheme://host[:port]/path` with the query and fragment dropped.
/// This is the form used as the base when resolving links found on that
/// page.
///
/// # Errors
///
/// * `UrlError::Invalid` - `raw` does not parse as a URL
/// * `UrlError::NotAbsolute` - the scheme is not http/https or the host is
///   empty
pub fn extract_parent_url(raw: &str) -> Result<String, UrlError> {
    let u = Url::parse(raw).map_err(|e| UrlError::Invalid(e.to_string()))?;

    if (u.scheme() != "http" && u.scheme() != "https") || !u.has_host() {
        return Err(UrlError::NotAbsolute);
    }

    Ok(format!("{}://{}{}", u.scheme(), host_with_port(&u), u.path()))
}

/// Resolves a discovered hyperlink against the page it was found on
///
/// `raw` may be absolute or relative; `base` is the canonical address of the
/// fetched page (as produced by [`extract_parent_url`]). Resolution follows
/// standard RFC 3986 reference semantics: relative paths are resolved
/// against the base path, absolute paths and absolute URLs replace it, and
/// `.`/`..` segments are normalized. The result keeps the merged query
/// (a base query is never inherited by a non-empty reference) and never a
/// fragment.
///
/// Every hyperlink discovered during a crawl passes through this function
/// before it is considered for the discovery graph, so no two spellings of
/// the same resource end up as distinct record keys.
///
/// # Errors
///
/// * `UrlError::Invalid` - either string does not parse, or the join fails
/// * `UrlError::UnsupportedScheme` - either URL is opaque (`mailto:`,
///   `tel:`, `data:`, ...) or carries a scheme other than http/https
pub fn extract_url(base: &str, raw: &str) -> Result<UrlEntity, UrlError> {
    // A relative reference fails to parse on its own; that is fine, the
    // join below handles it. Anything that parses standalone must pass the
    // scheme check.
    match Url::parse(raw) {
        Ok(u) => ensure_supported(&u, raw)?,
        Err(url::ParseError::RelativeUrlWithoutBase) => {}
        Err(e) => return Err(UrlError::Invalid(e.to_string())),
    }

    let base_url = Url::parse(base).map_err(|e| UrlError::Invalid(e.to_string()))?;
    ensure_supported(&base_url, base)?;

    let merged = base_url
        .join(raw)
        .map_err(|e| UrlError::Invalid(e.to_string()))?;

    let host = host_with_port(&merged);
    let mut canonical = format!("{}://{}{}", merged.scheme(), host, merged.path());

    if let Some(query) = merged.query() {
        if !query.is_empty() {
            canonical.push('?');
            canonical.push_str(query);
        }
    }

    Ok(UrlEntity {
        host,
        raw: canonical,
    })
}

/// Rejects opaque and non-http(s) URLs
fn ensure_supported(u: &Url, original: &str) -> Result<(), UrlError> {
    if u.cannot_be_a_base() || (u.scheme() != "http" && u.scheme() != "https") {
        return Err(UrlError::UnsupportedScheme(original.to_string()));
    }
    Ok(())
}

/// Host portion of a URL, keeping an explicit port when present
fn host_with_port(u: &Url) -> String {
    match (u.host_str(), u.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_http_url() {
        assert!(is_absolute_url("http://example1.com"));
        assert!(is_absolute_url("https://example1.com/path?q=1"));
    }

    #[test]
    fn test_absolute_url_with_port() {
        assert!(is_absolute_url("http://example1.com:8080/path"));
    }

    #[test]
    fn test_relative_url_is_not_absolute() {
        assert!(!is_absolute_url("/about"));
        assert!(!is_absolute_url("path/to/page"));
        assert!(!is_absolute_url("//example1.com/about"));
    }

    #[test]
    fn test_unsupported_schemes_are_not_absolute() {
        assert!(!is_absolute_url("mailto:admin@example1.com"));
        assert!(!is_absolute_url("ftp://example1.com/file"));
        assert!(!is_absolute_url("tel:+1234567890"));
    }

    #[test]
    fn test_garbage_is_not_absolute() {
        assert!(!is_absolute_url("not a url"));
        assert!(!is_absolute_url(""));
    }

    #[test]
    fn test_parent_url_strips_query_and_fragment() {
        let base = extract_parent_url("http://example1.com/main?x=1#frag").unwrap();
        assert_eq!(base, "http://example1.com/main");
    }

    #[test]
    fn test_parent_url_keeps_path() {
        let base = extract_parent_url("https://example1.com/a/b/c.html").unwrap();
        assert_eq!(base, "https://example1.com/a/b/c.html");
    }

    #[test]
    fn test_parent_url_keeps_explicit_port() {
        let base = extract_parent_url("http://example1.com:8080/main").unwrap();
        assert_eq!(base, "http://example1.com:8080/main");
    }

    #[test]
    fn test_parent_url_rejects_relative() {
        let err = extract_parent_url("/about").unwrap_err();
        assert!(matches!(err, UrlError::Invalid(_)));
    }

    #[test]
    fn test_parent_url_rejects_other_schemes() {
        let err = extract_parent_url("ftp://example1.com/file").unwrap_err();
        assert!(matches!(err, UrlError::NotAbsolute));
    }

    #[test]
    fn test_extract_url_host_relative_path() {
        let entity = extract_url("http://example1.com/main", "/about").unwrap();
        assert_eq!(entity.host, "example1.com");
        assert_eq!(entity.raw, "http://example1.com/about");
    }

    #[test]
    fn test_extract_url_path_relative() {
        let entity = extract_url("http://example1.com/a/b/index.html", "c/d").unwrap();
        assert_eq!(entity.raw, "http://example1.com/a/b/c/d");
    }

    #[test]
    fn test_extract_url_absolute_replaces_base() {
        let entity = extract_url("http://example1.com/main", "https://example123.com/x").unwrap();
        assert_eq!(entity.host, "example123.com");
        assert_eq!(entity.raw, "https://example123.com/x");
    }

    #[test]
    fn test_extract_url_normalizes_dot_segments() {
        let entity = extract_url("http://example1.com/a/b/", "../c/./d").unwrap();
        assert_eq!(entity.raw, "http://example1.com/a/c/d");
    }

    #[test]
    fn test_extract_url_keeps_query_from_link() {
        let entity = extract_url("http://example1.com/main", "/search?q=rust&page=2").unwrap();
        assert_eq!(entity.raw, "http://example1.com/search?q=rust&page=2");
    }

    #[test]
    fn test_extract_url_does_not_inherit_base_query() {
        let entity = extract_url("http://example1.com/main?session=abc", "/about").unwrap();
        assert_eq!(entity.raw, "http://example1.com/about");
    }

    #[test]
    fn test_extract_url_drops_fragment() {
        let entity = extract_url("http://example1.com/main", "/about#team").unwrap();
        assert_eq!(entity.raw, "http://example1.com/about");
    }

    #[test]
    fn test_extract_url_protocol_relative() {
        let entity = extract_url("https://example1.com/main", "//example123.com/x").unwrap();
        assert_eq!(entity.raw, "https://example123.com/x");
    }

    #[test]
    fn test_extract_url_keeps_port_from_base() {
        let entity = extract_url("http://example1.com:8080/main", "/about").unwrap();
        assert_eq!(entity.host, "example1.com:8080");
        assert_eq!(entity.raw, "http://example1.com:8080/about");
    }

    #[test]
    fn test_extract_url_rejects_opaque_links() {
        for raw in [
            "mailto:admin@example1.com",
            "tel:+1234567890",
            "javascript:void(0)",
            "data:text/html,hello",
        ] {
            let err = extract_url("http://example1.com/main", raw).unwrap_err();
            assert!(
                matches!(err, UrlError::UnsupportedScheme(_)),
                "expected UnsupportedScheme for {raw}"
            );
        }
    }

    #[test]
    fn test_extract_url_rejects_other_scheme_links() {
        let err = extract_url("http://example1.com/main", "ftp://example1.com/file").unwrap_err();
        assert!(matches!(err, UrlError::UnsupportedScheme(_)));
    }

    #[test]
    fn test_extract_url_rejects_bad_base() {
        let err = extract_url("not a url", "/about").unwrap_err();
        assert!(matches!(err, UrlError::Invalid(_)));

        let err = extract_url("mailto:admin@example1.com", "/about").unwrap_err();
        assert!(matches!(err, UrlError::UnsupportedScheme(_)));
    }

    #[test]
    fn test_extract_url_canonicalizes_seed_against_itself() {
        let entity = extract_url("http://Example1.COM", "http://Example1.COM").unwrap();
        assert_eq!(entity.host, "example1.com");
        assert_eq!(entity.raw, "http://example1.com/");
    }
}
