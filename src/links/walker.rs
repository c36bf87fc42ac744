//! Pre-order traversal of JSON document structures
//!
//! Docs, Sheets and Slides responses are deeply nested and differently shaped,
//! so link discovery does not try to understand them. Instead every node is
//! visited together with the path leading to it, and callers match on a
//! rendered form of that path.

use serde_json::Value;
use std::fmt;

/// One step from a node to one of its children
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Key into a JSON object
    Key(String),
    /// Position in a JSON array
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "[{}]", index),
            // Numeric object keys render like indices, so `{"0": ..}` and `[..]`
            // are indistinguishable to selectors.
            Self::Key(key) if is_numeric_key(key) => write!(f, "[{}]", key),
            Self::Key(key) => write!(f, "['{}']", key),
        }
    }
}

fn is_numeric_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

/// Sequence of segments from the root of a structure to a node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// The path of the root node
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new path one segment deeper
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment);
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Renders the path in bracketed form, e.g. `['body']['content'][3]['textRun']`
    ///
    /// The root renders as the empty string.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Returns true if the rendered path ends with `selector`
    pub fn ends_with(&self, selector: &str) -> bool {
        self.render().ends_with(selector)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// Lazy pre-order iterator over every node of a structure
///
/// Created by [`walk`]. Uses an explicit stack, so the walk itself is bounded
/// only by memory. Structures fetched from the APIs are parsed by `serde_json`,
/// which rejects documents nested deeper than 128 levels; such a body is
/// treated as missing and never reaches the walker.
pub struct Walk<'a> {
    stack: Vec<(Path, &'a Value)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (Path, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, value) = self.stack.pop()?;

        // Children are pushed in reverse so they come off the stack in document order
        match value {
            Value::Object(map) => {
                for (key, child) in map.iter().rev() {
                    self.stack
                        .push((path.child(PathSegment::Key(key.clone())), child));
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate().rev() {
                    self.stack.push((path.child(PathSegment::Index(index)), child));
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
        }

        Some((path, value))
    }
}

/// Walks `root` in pre-order, yielding each node with its path
///
/// The root itself is yielded first with an empty path.
///
/// # Example
///
/// ```
/// use paper_chaser::links::walk;
/// use serde_json::json;
///
/// let doc = json!({"a": [1, {"b": null}]});
/// let paths: Vec<String> = walk(&doc).map(|(path, _)| path.render()).collect();
/// assert_eq!(paths, vec!["", "['a']", "['a'][0]", "['a'][1]", "['a'][1]['b']"]);
/// ```
pub fn walk(root: &Value) -> Walk<'_> {
    Walk {
        stack: vec![(Path::root(), root)],
    }
}

/// Collects every node whose rendered path ends with `selector`
pub fn find_by_suffix<'a>(root: &'a Value, selector: &str) -> Vec<&'a Value> {
    walk(root)
        .filter(|(path, _)| !path.is_root() && path.ends_with(selector))
        .map(|(_, value)| value)
        .collect()
}
