//! Heading identifiers.
//!
//! Every heading gets an `id` derived from its text. Slugs are deterministic
//! and never contain `_`.
//!
//! - Lowercase ASCII, keep ASCII and Unicode alphanumerics
//! - Collapse every other run of characters into a single `-`
//! - Strip leading and trailing dashes
//! - Fall back to `heading` when nothing is left
//!
//! Uniqueness within one document is handled by [`Slugger`], which appends
//! `-1`, `-2`, ... to repeated slugs.

use std::collections::{HashMap, HashSet};

const FALLBACK: &str = "heading";

/// Slugify heading text without any uniqueness bookkeeping.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        FALLBACK.to_string()
    } else {
        slug
    }
}

/// Per-document slug generator; each render call owns one.
#[derive(Debug, Default)]
pub struct Slugger {
    used: HashSet<String>,
    counts: HashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unique slug for `text` within this document.
    pub fn next_slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let mut n = self.counts.get(&base).copied().unwrap_or(0);
        let mut candidate = if n == 0 {
            base.clone()
        } else {
            format!("{base}-{n}")
        };
        while self.used.contains(&candidate) {
            n += 1;
            candidate = format!("{base}-{n}");
        }
        self.counts.insert(base, n);
        self.used.insert(candidate.clone());
        candidate
    }

    /// Claim an explicit id as written, suffixing `-1`, `-2`, ... when an
    /// earlier heading already holds it. Generated slugs avoid every claim.
    pub fn claim(&mut self, id: &str) -> String {
        let mut candidate = id.to_string();
        let mut n = 0;
        while self.used.contains(&candidate) {
            n += 1;
            candidate = format!("{id}-{n}");
        }
        self.used.insert(candidate.clone());
        candidate
    }
}
