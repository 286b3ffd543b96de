//! Markdown to HTML fragments.
//!
//! Rendering happens in two halves. [`render`] parses markdown into a
//! [`Fragment`]: the pulldown-cmark event stream with heading ids already
//! assigned and tables wrapped in a scrolling container. Later stages (link
//! resolution, id namespacing, TOC extraction) work on those events, and the
//! fragment is serialized to HTML exactly once with [`Fragment::to_html`].
//! Nothing downstream pattern-matches serialized markup.
//!
//! ## Fence normalization
//!
//! Fences indented under list items often aren't recognized as code blocks.
//! [`normalize_fences`] runs before parsing and pulls every fence back to the
//! left margin:
//!
//! ```text
//! 1. Install:                    1. Install:
//!    ```sh                       ```sh
//!    cargo install wikifold  →   cargo install wikifold
//!      --locked                    --locked
//!    ```                         ```
//! ```
//!
//! The opening fence's indent width is removed from the opening line, from
//! the closing line, and (up to that width) from every line in between, so
//! deeper indentation inside the block survives.

use crate::slug::Slugger;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};

const FENCE: &str = "```";
const TABLE_WRAPPER_OPEN: &str = r#"<div class="table-wrapper">"#;
const TABLE_WRAPPER_CLOSE: &str = "</div>";

/// Rendered document body as a structured event sequence.
#[derive(Debug, Clone, Default)]
pub struct Fragment<'a> {
    events: Vec<Event<'a>>,
}

impl<'a> Fragment<'a> {
    pub fn from_events(events: Vec<Event<'a>>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[Event<'a>] {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut Vec<Event<'a>> {
        &mut self.events
    }

    /// Serialize to an HTML string.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        html::push_html(&mut out, self.events.iter().cloned());
        out
    }
}

/// Markdown features enabled for every document.
pub fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options
}

/// Parse markdown into a fragment with heading ids and wrapped tables.
///
/// Expects a body that already went through [`normalize_fences`].
pub fn render(markdown: &str) -> Fragment<'_> {
    let mut events: Vec<Event<'_>> = Parser::new_ext(markdown, options()).collect();
    assign_heading_ids(&mut events);
    Fragment::from_events(wrap_tables(events))
}

/// Give every heading a unique id within this document.
///
/// Explicit `{#id}` attributes are claimed first, in document order; a
/// repeated explicit id gets a counter like a repeated slug. Generated slugs
/// then avoid every claimed id.
fn assign_heading_ids(events: &mut [Event<'_>]) {
    let mut slugger = Slugger::new();
    for event in events.iter_mut() {
        if let Event::Start(Tag::Heading { id: Some(id), .. }) = event {
            *id = CowStr::from(slugger.claim(id));
        }
    }

    for i in 0..events.len() {
        if !matches!(events[i], Event::Start(Tag::Heading { id: None, .. })) {
            continue;
        }
        let slug = slugger.next_slug(&heading_text(&events[i + 1..]));
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(slug));
        }
    }
}

/// Plain text of a heading, given the events following its start tag.
///
/// Inline markup is dropped; only text and code spans contribute.
pub fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text
}

/// Surround every table with a horizontally scrollable container.
fn wrap_tables(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    for event in events {
        match event {
            Event::Start(Tag::Table(_)) => {
                out.push(Event::Html(CowStr::Borrowed(TABLE_WRAPPER_OPEN)));
                out.push(event);
            }
            Event::End(TagEnd::Table) => {
                out.push(event);
                out.push(Event::Html(CowStr::Borrowed(TABLE_WRAPPER_CLOSE)));
            }
            _ => out.push(event),
        }
    }
    out
}

/// Pull indented code fences back to the left margin.
///
/// Lines outside a fence are untouched, and already-flush fences are a no-op,
/// so applying this twice gives the same result as applying it once.
pub fn normalize_fences(markdown: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut open_indent: Option<usize> = None;

    for line in markdown.split('\n') {
        let indent = leading_spaces(line);
        let is_fence = line[indent..].starts_with(FENCE);

        match (open_indent, is_fence) {
            (None, true) => {
                out.push(&line[indent..]);
                open_indent = Some(indent);
            }
            (Some(width), true) => {
                out.push(&line[indent.min(width)..]);
                open_indent = None;
            }
            (Some(width), false) => out.push(&line[indent.min(width)..]),
            (None, false) => out.push(line),
        }
    }

    out.join("\n")
}

fn leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b' ').count()
}
