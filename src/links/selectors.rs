//! Per-type selector sets
//!
//! Each Google editor exposes links and free text under different keys. The
//! selectors below are path suffixes into the Docs v1, Sheets v4 and Slides v1
//! response structures.

use crate::drive::{ObjectBody, ObjectKind};
use crate::links::extractor::{dedup, extract_links};

/// Native-link and text-element selectors for one kind of file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorSet {
    /// Paths whose values are already URLs
    pub native_links: &'static [&'static str],
    /// Paths whose values are free text that may contain URLs
    pub text_elements: &'static [&'static str],
}

const DOCUMENT_SELECTORS: SelectorSet = SelectorSet {
    native_links: &["['link']['url']"],
    text_elements: &["['textRun']['content']"],
};

const SPREADSHEET_SELECTORS: SelectorSet = SelectorSet {
    native_links: &["['link']['uri']"],
    text_elements: &[
        // Cell values
        "['userEnteredValue']['stringValue']",
        // Cell notes
        "['note']",
        // Chart alt text
        "['spec']['altText']",
    ],
};

const PRESENTATION_SELECTORS: SelectorSet = SelectorSet {
    native_links: &["['link']['url']"],
    text_elements: &[
        "['textRun']['content']",
        // Alt text
        "['description']",
        // Embedded chart titles
        "['title']",
        "['wordArt']['renderedText']",
    ],
};

/// Returns the selectors for a kind of file, if its body is a searchable structure
pub fn selectors_for(kind: ObjectKind) -> Option<SelectorSet> {
    match kind {
        ObjectKind::Document => Some(DOCUMENT_SELECTORS),
        ObjectKind::Spreadsheet => Some(SPREADSHEET_SELECTORS),
        ObjectKind::Presentation => Some(PRESENTATION_SELECTORS),
        ObjectKind::Folder | ObjectKind::Other => None,
    }
}

/// Builds the canonical "open" link for a Drive ID
pub fn open_link(id: &str) -> String {
    format!("https://drive.google.com/open?id={}", id)
}

/// Extracts the links contained in a fetched file body
///
/// Folder children are turned into open links directly; structured bodies are
/// searched with the selector set for their kind.
pub fn links_for(kind: ObjectKind, body: &ObjectBody) -> Vec<String> {
    match body {
        ObjectBody::Children(children) => dedup(children.iter().map(|child| open_link(&child.id))),
        ObjectBody::Structure(structure) => match selectors_for(kind) {
            Some(selectors) => {
                extract_links(structure, selectors.native_links, selectors.text_elements)
            }
            None => Vec::new(),
        },
        ObjectBody::Empty => Vec::new(),
    }
}
