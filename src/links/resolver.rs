//! Drive ID recovery from URLs
//!
//! Drive, Docs and Sheets URLs come in many shapes (`/open?id=`, `/file/d/<id>/view`,
//! `/spreadsheets/d/<id>/edit#gid=0`, ...). Rather than parsing each shape, the
//! resolver checks the origin and then looks for a token long enough to be a
//! Drive ID.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Origins that serve Drive files
pub const DRIVE_ORIGINS: &[&str] = &[
    "https://drive.google.com",
    "https://docs.google.com",
    "https://sheets.google.com",
];

/// A run of at least 25 ID characters preceded by a delimiter.
///
/// The leading `.*` is greedy, so when several tokens qualify the one
/// captured is the last.
static DRIVE_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r".*[^-A-Za-z0-9_]([-A-Za-z0-9_]{25,})[^-A-Za-z0-9_]?.*")
        .expect("Drive ID pattern is valid")
});

/// Maps URLs to Drive IDs, restricted to an allow-list of origins
#[derive(Debug, Clone)]
pub struct Resolver {
    allowed_origins: Vec<String>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DRIVE_ORIGINS.iter().map(|o| o.to_string()).collect())
    }
}

impl Resolver {
    /// Creates a resolver accepting only the given origins (`scheme://host[:port]`)
    pub fn new(allowed_origins: Vec<String>) -> Self {
        Self { allowed_origins }
    }

    /// Returns true if the URL's origin is in the allow-list
    ///
    /// Plain `http://` URLs are checked as if they were `https://`.
    pub fn is_allowed(&self, url: &str) -> bool {
        let upgraded = match url.strip_prefix("http://") {
            Some(rest) => format!("https://{}", rest),
            None => url.to_string(),
        };

        match Url::parse(&upgraded) {
            Ok(parsed) => {
                let origin = parsed.origin().ascii_serialization();
                self.allowed_origins.iter().any(|allowed| *allowed == origin)
            }
            Err(e) => {
                tracing::trace!("Unparsable URL {}: {}", url, e);
                false
            }
        }
    }

    /// Extracts the Drive ID from a single URL
    ///
    /// Returns `None` if the URL is not on an allowed origin or contains no
    /// ID-shaped token.
    pub fn resolve_id(&self, url: &str) -> Option<String> {
        if !self.is_allowed(url) {
            return None;
        }

        DRIVE_ID_PATTERN
            .captures(url)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Extracts unique Drive IDs from a list of URLs, in first-seen order
    pub fn resolve_ids<I, S>(&self, urls: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        super::dedup(
            urls.into_iter()
                .filter_map(|url| self.resolve_id(url.as_ref())),
        )
    }
}

/// Extracts unique Drive IDs from a list of URLs using the default Drive origins
///
/// # Example
///
/// ```
/// use paper_chaser::links::resolve_ids;
///
/// let ids = resolve_ids([
///     "https://drive.google.com/open?id=ABCDEFGHIJKLMNOPQRSTUVWXY",
///     "https://example.com/open?id=ABCDEFGHIJKLMNOPQRSTUVWXY",
/// ]);
/// assert_eq!(ids, vec!["ABCDEFGHIJKLMNOPQRSTUVWXY"]);
/// ```
pub fn resolve_ids<I, S>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Resolver::default().resolve_ids(urls)
}
