//! Content parsing: title, description, and same-site links
//!
//! The extraction here is positional scanning over the raw markup, not DOM
//! parsing. That is deliberate: partial or malformed markup truncates the
//! scan at the broken point and whatever was extracted up to there is kept.
//! The description is a non-redundant word cloud, not a grammatical summary;
//! its greedy substring check is load-bearing for how pages are indexed and
//! must not be reworked into something smarter.

use crate::url::{is_http_scheme, resolve_href, within_seed};
use scraper::Html;
use url::Url;

/// Everything extracted from one fetched page
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedContent {
    /// Text of the first title tag; empty when absent
    pub title: String,

    /// Word-cloud description; empty when nothing was extracted
    pub description: String,

    /// Same-site links, absolute and deduplicated downstream by the frontier
    pub links: Vec<Url>,
}

/// Parses fetched page content
///
/// `seed_root` is the seed's root URL string; only links whose string form
/// starts with it are kept. With `meta_data_only` set, the description comes
/// from description/keywords meta tags; otherwise from the page's full text.
pub fn parse_content(
    content: &str,
    page_url: &Url,
    seed_root: &str,
    meta_data_only: bool,
) -> ParsedContent {
    // ASCII lowering keeps byte offsets aligned with the original content,
    // so positions found in one slice index safely into the other.
    let lower = content.to_ascii_lowercase();

    let words = if meta_data_only {
        meta_tokens(content, &lower)
    } else {
        full_text_tokens(content)
    };

    ParsedContent {
        title: extract_title(content, &lower),
        description: build_description(words),
        links: extract_links(content, &lower, page_url, seed_root),
    }
}

/// Text strictly between the first `<title>` and the next `</title>`
fn extract_title(content: &str, lower: &str) -> String {
    let Some(open) = lower.find("<title>") else {
        return String::new();
    };
    let start = open + "<title>".len();

    match lower[start..].find("</title>") {
        Some(len) => content[start..start + len].trim().to_string(),
        None => String::new(),
    }
}

/// Content attributes of description/keywords meta tags, tokenized
fn meta_tokens(content: &str, lower: &str) -> Vec<String> {
    let mut collected = String::new();
    let mut from = 0;

    while let Some(found) = lower[from..].find("<meta") {
        let start = from + found;
        let Some(len) = lower[start..].find('>') else {
            break;
        };
        let end = start + len;
        let tag = &content[start..=end];
        from = end + 1;

        // Whitespace-insensitive attribute matching
        let stripped: String = tag
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        if stripped.contains("name=\"description\"") || stripped.contains("name=\"keywords\"") {
            if let Some(value) = quoted_attr(tag, "content") {
                collected.push_str(value);
                collected.push(' ');
            }
        }
    }

    tokenize(&collected)
}

/// Full page text stripped of markup, tokenized and sorted longest-first
fn full_text_tokens(content: &str) -> Vec<String> {
    let document = Html::parse_document(content);
    let text = document.root_element().text().collect::<Vec<_>>().join(" ");

    let mut tokens = tokenize(&text);
    tokens.sort_by(|a, b| b.len().cmp(&a.len()));
    tokens
}

/// Greedily appends each token unless it is already a substring of the
/// description built so far
fn build_description(words: Vec<String>) -> String {
    let mut description = String::new();

    for word in words {
        if !description.contains(&word) {
            description.push_str(&word);
            description.push(' ');
        }
    }

    description.trim_end().to_string()
}

/// Splits on non-word characters, dropping empty tokens
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Scans `<a ...>...</a>` spans for same-site links
fn extract_links(content: &str, lower: &str, page_url: &Url, seed_root: &str) -> Vec<Url> {
    let mut links = Vec::new();
    let mut from = 0;

    while let Some(found) = lower[from..].find("<a") {
        let start = from + found;
        let Some(len) = lower[start..].find("</a>") else {
            break;
        };
        let end = start + len + "</a>".len();
        let span = &content[start..end];
        from = end;

        if !lower[start..end].contains("href") {
            continue;
        }
        let Some(href) = quoted_attr(span, "href") else {
            continue;
        };
        let Some(resolved) = resolve_href(href, page_url) else {
            continue;
        };

        if is_http_scheme(&resolved) && within_seed(&resolved, seed_root) {
            links.push(resolved);
        }
    }

    links
}

/// First double-quoted value following the named attribute
fn quoted_attr<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let tag_lower = tag.to_ascii_lowercase();
    let at = tag_lower.find(name)?;
    let open = at + tag[at..].find('"')?;
    let close = open + 1 + tag[open + 1..].find('"')?;
    Some(&tag[open + 1..close])
}
