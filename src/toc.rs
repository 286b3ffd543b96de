//! Per-document table of contents.
//!
//! Reads headings straight from a namespaced [`Fragment`], so every entry's
//! id is the same id the heading element carries in the final page.

use crate::render::{Fragment, heading_text};
use pulldown_cmark::{Event, Tag};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Heading level, 1 through 6.
    pub level: u8,
    /// Element id of the heading (already namespaced).
    pub id: String,
    /// Plain heading text with inline markup stripped.
    pub text: String,
}

/// A document's headings in document order, or an explicit empty marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "entries", rename_all = "lowercase")]
pub enum Toc {
    Empty,
    Entries(Vec<TocEntry>),
}

impl Toc {
    pub fn entries(&self) -> &[TocEntry] {
        match self {
            Toc::Empty => &[],
            Toc::Entries(entries) => entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Toc::Empty)
    }
}

/// Collect every heading with an id and non-blank text.
pub fn extract(fragment: &Fragment<'_>) -> Toc {
    let events = fragment.events();
    let mut entries = Vec::new();

    for (i, event) in events.iter().enumerate() {
        let Event::Start(Tag::Heading {
            level, id: Some(id), ..
        }) = event
        else {
            continue;
        };
        let text = heading_text(&events[i + 1..]);
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        entries.push(TocEntry {
            level: *level as u8,
            id: id.to_string(),
            text: text.to_string(),
        });
    }

    if entries.is_empty() {
        Toc::Empty
    } else {
        Toc::Entries(entries)
    }
}
