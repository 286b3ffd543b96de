//! Heading id namespacing.
//!
//! Every document is rendered on its own, so two documents with an
//! `## Overview` heading both produce `id="overview"`. Before the sections are
//! combined, each id is prefixed with its document's section:
//!
//! ```text
//! document 3:  <h2 id="overview">   →   <h2 id="section-3_overview">
//!              <a href="#overview"> →   <a href="#section-3_overview">
//! ```
//!
//! The ordinal is all digits, so the first `_` always ends the section prefix
//! and distinct `(ordinal, id)` pairs can't produce the same string.
//! Same-document `#fragment` links that pointed at a local heading are
//! rewritten to follow it.

use crate::render::Fragment;
use pulldown_cmark::{CowStr, Event, Tag};
use std::collections::HashSet;

/// Globally unique id for heading `local` of document `ordinal`.
pub fn namespaced_id(ordinal: usize, local: &str) -> String {
    format!("section-{ordinal}_{local}")
}

/// Id of the section container for document `ordinal`.
pub fn section_id(ordinal: usize) -> String {
    format!("section-{ordinal}")
}

/// Prefix every heading id in `fragment` and follow same-document links.
pub fn namespace_headings(fragment: &mut Fragment<'_>, ordinal: usize) {
    let mut local_ids = HashSet::new();

    for event in fragment.events_mut().iter_mut() {
        if let Event::Start(Tag::Heading { id: Some(id), .. }) = event {
            local_ids.insert(id.to_string());
            *id = CowStr::from(namespaced_id(ordinal, id));
        }
    }

    for event in fragment.events_mut().iter_mut() {
        if let Event::Start(Tag::Link { dest_url, .. }) = event {
            let Some(anchor) = dest_url.strip_prefix('#') else {
                continue;
            };
            if local_ids.contains(anchor) {
                let rewritten = format!("#{}", namespaced_id(ordinal, anchor));
                *dest_url = CowStr::from(rewritten);
            }
        }
    }
}
