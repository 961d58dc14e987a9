//! Resolution of href values found in page content

use url::Url;

/// Resolves an href value against the page it was found on
///
/// - `//host/...` inherits the page's scheme
/// - `/path` resolves against the page's origin
/// - anything else is treated as an already-absolute URL
///
/// Returns None when the href cannot be turned into a URL.
pub fn resolve_href(href: &str, page: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    // Check the double slash first: a "//" href also starts with "/"
    if let Some(rest) = href.strip_prefix("//") {
        return Url::parse(&format!("{}://{}", page.scheme(), rest)).ok();
    }

    if href.starts_with('/') {
        return page.join(href).ok();
    }

    Url::parse(href).ok()
}

/// Whether the URL uses a scheme the crawler fetches
pub fn is_http_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Literal-prefix same-site test: a link belongs to a seed when its string
/// form starts with the seed's root URL string.
///
/// This is deliberately not a full origin comparison. Subdomains or sibling
/// paths that happen to share the prefix pass as well; that looseness is part
/// of the frontier model and the prefix-based child selection matches it.
pub fn within_seed(url: &Url, seed_root: &str) -> bool {
    url.as_str().starts_with(seed_root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://example.com/dir/page.html").unwrap()
    }

    #[test]
    fn test_root_relative_href_uses_page_origin() {
        let resolved = resolve_href("/x", &page()).unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/x");
    }

    #[test]
    fn test_scheme_relative_href_inherits_scheme() {
        let resolved = resolve_href("//cdn.example.com/asset", &page()).unwrap();
        assert_eq!(resolved.as_str(), "https://cdn.example.com/asset");
    }

    #[test]
    fn test_absolute_href_kept_as_is() {
        let resolved = resolve_href("http://other.org/page", &page()).unwrap();
        assert_eq!(resolved.as_str(), "http://other.org/page");
    }

    #[test]
    fn test_empty_href_is_dropped() {
        assert!(resolve_href("", &page()).is_none());
        assert!(resolve_href("   ", &page()).is_none());
    }

    #[test]
    fn test_relative_path_without_slash_is_not_resolved() {
        // Treated as absolute and fails to parse, so it is dropped
        assert!(resolve_href("other.html", &page()).is_none());
    }

    #[test]
    fn test_within_seed_prefix_match() {
        let url = Url::parse("https://example.com/blog/post").unwrap();
        assert!(within_seed(&url, "https://example.com/"));
        assert!(within_seed(&url, "https://example.com/blog"));
        assert!(!within_seed(&url, "https://example.com/shop"));
        assert!(!within_seed(&url, "https://other.org/"));
    }

    #[test]
    fn test_within_seed_is_a_string_prefix_test() {
        // Sibling path sharing the prefix passes; this looseness is intended
        let url = Url::parse("https://example.com/blogroll").unwrap();
        assert!(within_seed(&url, "https://example.com/blog"));
    }

    #[test]
    fn test_non_http_schemes_flagged() {
        let js = Url::parse("javascript:void(0)").unwrap();
        assert!(!is_http_scheme(&js));
        let https = Url::parse("https://example.com/").unwrap();
        assert!(is_http_scheme(&https));
    }
}
