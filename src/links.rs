//! Cross-document link resolution.
//!
//! Inside the combined page every document is a section addressed by its
//! ordinal, so `[setup](guide/setup.md)` has to become a trigger that shows
//! section N instead of a file link. A link qualifies when the path part of
//! its destination (everything before `#` or `?`) ends in `.md` or
//! `.markdown`. Destinations with a URI scheme (`https:`, `mailto:`) or a
//! network-path prefix (`//host/...`) are external and never touched.
//!
//! Resolution runs in two tiers:
//!
//! 1. **Path**: join the destination onto the linking document's folder,
//!    collapse `.` and `..`, and compare against every document's relative
//!    path. A leading `/` resolves from the input root. Climbing above the
//!    root skips this tier.
//! 2. **Name**: compare the destination's file name exactly against every
//!    document's file name; the first match in sequence order wins.
//!
//! A link that fails both tiers stays a plain link and yields a
//! [`Warning::UnresolvedLink`]. The `#anchor` part of a resolved link is
//! dropped; the trigger targets the whole section.
//!
//! Anchors typed as raw HTML (`<a href="setup.md">`) go through the same
//! resolution. Their opening tag is rewritten in place with
//! [lol_html](https://docs.rs/lol_html), keeping any other attributes.

use crate::diagnostics::{Warning, Warnings};
use crate::load::DocumentSequence;
use crate::naming::file_name;
use crate::render::Fragment;
use lol_html::{RewriteStrSettings, element, rewrite_str};
use pulldown_cmark::{CowStr, Event, Tag, TagEnd};
use std::collections::HashMap;

/// Lookup tables over one document sequence.
#[derive(Debug, Clone)]
pub struct LinkTargets {
    rel_paths: Vec<String>,
    by_path: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl LinkTargets {
    pub fn new(sequence: &DocumentSequence) -> Self {
        let rel_paths: Vec<String> = sequence.iter().map(|d| d.rel_path.clone()).collect();
        let mut by_path = HashMap::new();
        let mut by_name = HashMap::new();
        for (ordinal, rel_path) in rel_paths.iter().enumerate() {
            by_path.insert(rel_path.clone(), ordinal);
            by_name
                .entry(file_name(rel_path).to_string())
                .or_insert(ordinal);
        }
        Self {
            rel_paths,
            by_path,
            by_name,
        }
    }

    /// Relative path of the document at `ordinal`.
    pub fn rel_path(&self, ordinal: usize) -> Option<&str> {
        self.rel_paths.get(ordinal).map(String::as_str)
    }

    /// Ordinal a markdown destination points at, seen from document `from`.
    pub fn resolve(&self, from: usize, href: &str) -> Option<usize> {
        let target = markdown_target(href)?;
        let from_path = self.rel_path(from).unwrap_or("");

        if let Some(path) = join_relative(from_path, &target) {
            if let Some(&ordinal) = self.by_path.get(&path) {
                return Some(ordinal);
            }
        }
        self.by_name.get(file_name(&target)).copied()
    }
}

/// Path part of a destination that links to another markdown file.
///
/// Returns `None` for external destinations and for anything that isn't
/// markdown. Backslashes are read as `/`.
pub fn markdown_target(href: &str) -> Option<String> {
    if has_scheme(href) || href.starts_with("//") {
        return None;
    }
    let path = match href.find(['#', '?']) {
        Some(end) => &href[..end],
        None => href,
    };
    let lower = path.to_ascii_lowercase();
    if !(lower.ends_with(".md") || lower.ends_with(".markdown")) {
        return None;
    }
    Some(path.replace('\\', "/"))
}

/// `scheme:` per RFC 3986: a letter followed by letters, digits, `+`, `-` or `.`.
fn has_scheme(href: &str) -> bool {
    let Some(colon) = href.find(':') else {
        return false;
    };
    let scheme = &href[..colon];
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}

/// Resolve `target` against the folder of `from_path`.
///
/// Returns `None` when `..` would climb above the input root.
pub fn join_relative(from_path: &str, target: &str) -> Option<String> {
    let mut segments: Vec<&str> = if target.starts_with('/') {
        Vec::new()
    } else {
        let mut dir: Vec<&str> = from_path.split('/').collect();
        dir.pop();
        dir
    };

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            s => segments.push(s),
        }
    }
    Some(segments.join("/"))
}

/// Rewrite resolvable markdown links in one document's fragment.
///
/// Resolved links become section triggers; the rest are left as they were
/// and reported.
pub fn resolve_links(fragment: &mut Fragment<'_>, ordinal: usize, targets: &LinkTargets) -> Warnings {
    let mut warnings = Warnings::new();
    let from_path = targets.rel_path(ordinal).unwrap_or_default().to_string();
    let mut inside_trigger = false;

    for event in fragment.events_mut().iter_mut() {
        match event {
            Event::Start(Tag::Link { dest_url, .. }) => {
                if markdown_target(dest_url).is_none() {
                    continue;
                }
                match targets.resolve(ordinal, dest_url) {
                    Some(target) => {
                        log::debug!("{from_path}: '{dest_url}' -> section {target}");
                        *event = Event::InlineHtml(CowStr::from(trigger_open(target)));
                        inside_trigger = true;
                    }
                    None => warnings.push(Warning::UnresolvedLink {
                        path: from_path.clone(),
                        href: dest_url.to_string(),
                    }),
                }
            }
            Event::End(TagEnd::Link) if inside_trigger => {
                *event = Event::InlineHtml(CowStr::Borrowed("</a>"));
                inside_trigger = false;
            }
            Event::InlineHtml(markup) | Event::Html(markup) => {
                if let Some(rewritten) = rewrite_html_anchors(markup, ordinal, targets, &mut warnings) {
                    *markup = CowStr::from(rewritten);
                }
            }
            _ => {}
        }
    }
    warnings
}

/// Rewrite raw `<a href="...md">` tags inside a piece of inline or block HTML.
///
/// Returns `None` when nothing was rewritten, leaving the markup untouched.
fn rewrite_html_anchors(
    markup: &str,
    ordinal: usize,
    targets: &LinkTargets,
    warnings: &mut Warnings,
) -> Option<String> {
    if !markup.to_ascii_lowercase().contains("<a") {
        return None;
    }
    let from_path = targets.rel_path(ordinal).unwrap_or_default();
    let mut rewritten = false;

    let result = rewrite_str(
        markup,
        RewriteStrSettings {
            element_content_handlers: vec![element!("a[href]", |el| {
                let Some(href) = el.get_attribute("href") else {
                    return Ok(());
                };
                if markdown_target(&href).is_none() {
                    return Ok(());
                }
                match targets.resolve(ordinal, &href) {
                    Some(target) => {
                        log::debug!("{from_path}: '{href}' -> section {target}");
                        for (name, value) in trigger_attributes(target) {
                            el.set_attribute(name, &value)?;
                        }
                        rewritten = true;
                    }
                    None => warnings.push(Warning::UnresolvedLink {
                        path: from_path.to_string(),
                        href,
                    }),
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    );

    match result {
        Ok(html) if rewritten => Some(html),
        Ok(_) => None,
        Err(err) => {
            log::warn!("{from_path}: could not rewrite inline HTML: {err}");
            None
        }
    }
}

/// Attributes that turn an anchor into an in-page trigger for section `ordinal`.
fn trigger_attributes(ordinal: usize) -> [(&'static str, String); 4] {
    [
        ("href", format!("#section-{ordinal}")),
        ("onclick", format!("navigateToSection({ordinal}); return false;")),
        ("class", "internal-link".to_string()),
        ("data-section-index", ordinal.to_string()),
    ]
}

/// Opening tag of an in-page trigger for section `ordinal`.
pub fn trigger_open(ordinal: usize) -> String {
    let attributes: Vec<String> = trigger_attributes(ordinal)
        .iter()
        .map(|(name, value)| format!(r#"{name}="{value}""#))
        .collect();
    format!("<a {}>", attributes.join(" "))
}
