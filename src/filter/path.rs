//! Dotted property paths per QUERY.md §2
//!
//! A `MetadataPath` is the parsed form of a dotted filter path such as
//! `friend.friend.name`: zero or more link-navigation hops, outermost
//! first, ending in the leaf property name.
//!
//! Paths are value-immutable. The same logical path is probed
//! independently by the exact, range, map and full-text resolution
//! modes, so every builder returns a fresh value instead of mutating
//! in place.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An ordered, never-empty sequence of property names; the last
/// element is the leaf property, earlier elements are navigation hops
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetadataPath {
    items: Vec<String>,
}

impl MetadataPath {
    /// Creates a path consisting of a single leaf property
    pub fn property(leaf: impl Into<String>) -> Self {
        Self {
            items: vec![leaf.into()],
        }
    }

    /// Parses a dotted path.
    ///
    /// Parsing never fails: a segment that names no real property
    /// simply resolves to no candidate later, which is the uniform
    /// failure mode of the planner (QUERY.md §1).
    pub fn parse(text: &str) -> Self {
        Self {
            items: text.split('.').map(str::to_string).collect(),
        }
    }

    /// Returns a new path with `hop` prepended as the outermost
    /// navigation segment
    pub fn with_hop(&self, hop: impl Into<String>) -> Self {
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.push(hop.into());
        items.extend(self.items.iter().cloned());
        Self { items }
    }

    /// Returns the leaf property name
    pub fn leaf(&self) -> &str {
        // Invariant: items is never empty
        self.items.last().map(String::as_str).unwrap_or_default()
    }

    /// Returns the navigation hops (everything but the leaf)
    pub fn hops(&self) -> &[String] {
        &self.items[..self.items.len() - 1]
    }

    /// Splits off the outermost hop, returning it with the remainder
    /// path. Returns `None` when only the leaf remains.
    pub fn split_first(&self) -> Option<(&str, MetadataPath)> {
        if self.items.len() < 2 {
            return None;
        }
        let rest = MetadataPath {
            items: self.items[1..].to_vec(),
        };
        Some((&self.items[0], rest))
    }

    /// Number of segments including the leaf
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// A path always holds at least the leaf
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl From<&str> for MetadataPath {
    fn from(text: &str) -> Self {
        MetadataPath::parse(text)
    }
}

impl fmt::Display for MetadataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.items.join("."))
    }
}
