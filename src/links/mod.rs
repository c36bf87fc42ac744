//! Link handling module for Paper-Chaser
//!
//! This module provides structure traversal, link extraction from Drive file
//! bodies, and resolution of extracted URLs back into Drive IDs.
//!
//! # Example
//!
//! ```
//! use paper_chaser::links::{extract_links, resolve_ids};
//! use serde_json::json;
//!
//! let body = json!({"a": {"link": {
//!     "url": "https://drive.google.com/open?id=ABCDEFGHIJKLMNOPQRSTUVWXY"
//! }}});
//! let links = extract_links(&body, &["['link']['url']"], &[]);
//! assert_eq!(resolve_ids(&links), vec!["ABCDEFGHIJKLMNOPQRSTUVWXY"]);
//! ```

mod extractor;
mod resolver;
mod selectors;
mod walker;

// Re-export main functions
pub use extractor::{dedup, extract_links, find_urls};
pub use resolver::{resolve_ids, Resolver, DRIVE_ORIGINS};
pub use selectors::{links_for, open_link, selectors_for, SelectorSet};
pub use walker::{find_by_suffix, walk, Path, PathSegment, Walk};
