//! Link extraction from Drive file structures
//!
//! Links come from two kinds of places in a structure:
//! - native links, where the API already exposes a URL (`['link']['url']`)
//! - text elements, free text that may mention URLs anywhere inside it

use crate::links::walker::find_by_suffix;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Web URL pattern: scheme, optional userinfo, public IPv4 or a hostname with
/// a TLD of two or more letters, optional port, and a path up to whitespace.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i:https?|ftp)://",
        r"(?:\S+(?::\S*)?@)?",
        r"(?:",
        r"(?:[1-9]|[1-9][0-9]|1[0-9][0-9]|2[0-1][0-9]|22[0-3])",
        r"(?:\.(?:[0-9]|[1-9][0-9]|1[0-9][0-9]|2[0-4][0-9]|25[0-5])){2}",
        r"(?:\.(?:[1-9]|[1-9][0-9]|1[0-9][0-9]|2[0-4][0-9]|25[0-4]))",
        r"|",
        r"(?:(?:[a-zA-Z\x{00a1}-\x{ffff}0-9]+-?)*[a-zA-Z\x{00a1}-\x{ffff}0-9]+)",
        r"(?:\.(?:[a-zA-Z\x{00a1}-\x{ffff}0-9]+-?)*[a-zA-Z\x{00a1}-\x{ffff}0-9]+)*",
        r"(?:\.(?:[a-zA-Z\x{00a1}-\x{ffff}]{2,}))",
        r")",
        r"(?::[0-9]{2,5})?",
        r"(?:/\S*)?",
    ))
    .expect("URL pattern is valid")
});

/// Finds every URL embedded in a piece of free text, in order of appearance
///
/// # Example
///
/// ```
/// use paper_chaser::links::find_urls;
///
/// let urls = find_urls("docs at https://docs.google.com/document/d/abc and http://example.com");
/// assert_eq!(urls, vec!["https://docs.google.com/document/d/abc", "http://example.com"]);
/// ```
pub fn find_urls(text: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Removes duplicates, keeping the first occurrence of each item
pub fn dedup<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Extracts all links from a file structure
///
/// Text elements are only scanned when they mention `http://` or `https://`.
/// Values matched by a native selector are taken verbatim. Matches that are
/// not strings are passed through as their JSON text, which never resolves to
/// a Drive ID.
///
/// Links found in text come first, followed by native links, each group in
/// selector order and then document order. Duplicates keep their first position.
///
/// # Arguments
///
/// * `structure` - The parsed JSON body of a Doc, Sheet or Slide
/// * `native_link_selectors` - Path suffixes whose values are URLs
/// * `text_element_selectors` - Path suffixes whose values are free text
pub fn extract_links(
    structure: &Value,
    native_link_selectors: &[&str],
    text_element_selectors: &[&str],
) -> Vec<String> {
    let mut text_links = Vec::new();
    for selector in text_element_selectors {
        for value in find_by_suffix(structure, selector) {
            let Some(text) = value.as_str() else {
                continue;
            };
            if !(text.contains("https://") || text.contains("http://")) {
                continue;
            }
            text_links.extend(find_urls(text));
        }
    }

    let mut native_links = Vec::new();
    for selector in native_link_selectors {
        for value in find_by_suffix(structure, selector) {
            match value.as_str() {
                Some(link) => native_links.push(link.to_string()),
                None => {
                    tracing::trace!("Non-string value at native selector {}", selector);
                    native_links.push(value.to_string());
                }
            }
        }
    }

    dedup(text_links.into_iter().chain(native_links))
}
