//! Tag index: every frontmatter tag mapped to the documents that carry it.
//!
//! Documents are processed independently, each producing its own small
//! [`TagIndex`]. The per-document indexes are then folded together in
//! sequence order with [`TagIndex::merge`], which keeps every bucket ordered
//! by ordinal no matter how processing was scheduled.
//!
//! A tag listed twice in one document's frontmatter produces two entries.
//! Nothing is sorted or deduplicated within a document.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagEntry {
    pub ordinal: usize,
    pub title: String,
    pub path: String,
}

/// Tag name to tagged documents. Serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagIndex {
    tags: BTreeMap<String, Vec<TagEntry>>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry per tag for the given document.
    pub fn record(&mut self, ordinal: usize, title: &str, path: &str, tags: &[String]) {
        for tag in tags {
            self.tags.entry(tag.clone()).or_default().push(TagEntry {
                ordinal,
                title: title.to_string(),
                path: path.to_string(),
            });
        }
    }

    /// Append every bucket of `other` after this index's entries.
    pub fn merge(&mut self, other: TagIndex) {
        for (tag, entries) in other.tags {
            self.tags.entry(tag).or_default().extend(entries);
        }
    }

    /// Entries for `tag`, in document order.
    pub fn get(&self, tag: &str) -> &[TagEntry] {
        self.tags.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of entries under `tag`.
    pub fn count(&self, tag: &str) -> usize {
        self.get(tag).len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Number of distinct tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Tags in lexicographic order with their entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TagEntry])> {
        self.tags.iter().map(|(tag, entries)| (tag.as_str(), entries.as_slice()))
    }
}
