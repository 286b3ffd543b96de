//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Each document is shown
//! by its ordinal and title, with the source path as an indented `Source:`
//! line. This reads as an inventory of the generated page while still letting
//! users trace every section back to a file.
//!
//! # Output Format
//!
//! ```text
//! Documents
//! 000 Index
//!     Source: index.md
//!     Headings: 2
//! 001 Guide / Setup
//!     Source: guide/setup.md
//!     Tags: setup, intro
//!
//! Navigation
//! Index
//! Guide/
//!     Setup
//!
//! Tags
//! intro (1)
//! setup (1)
//!
//! Warnings
//! guide/setup.md: could not resolve link 'missing.md'
//!
//! Converted 2 documents, 2 tags, 1 warning → index.html
//! ```
//!
//! # Architecture
//!
//! Each block has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::diagnostics::Warnings;
use crate::nav::{self, NavNode};
use crate::process::Conversion;
use crate::tags::TagIndex;
use std::path::Path;

/// Format an ordinal as 3-digit zero-padded.
fn format_index(ordinal: usize) -> String {
    format!("{:0>3}", ordinal)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Document inventory: one header line per document plus context lines.
pub fn format_documents(conversion: &Conversion) -> Vec<String> {
    let mut lines = vec!["Documents".to_string()];
    for doc in &conversion.documents {
        lines.push(format!("{} {}", format_index(doc.ordinal), doc.title));
        lines.push(format!("{}Source: {}", indent(1), doc.rel_path));
        let headings = doc.toc.entries().len();
        if headings > 0 {
            lines.push(format!("{}Headings: {}", indent(1), headings));
        }
        if !doc.tags.is_empty() {
            lines.push(format!("{}Tags: {}", indent(1), doc.tags.join(", ")));
        }
    }
    lines
}

/// Navigation tree as an indented outline; folders end with `/`.
pub fn format_navigation(nodes: &[NavNode]) -> Vec<String> {
    let mut lines = vec!["Navigation".to_string()];
    nav::walk(nodes, &mut |node, depth| {
        let label = match node {
            NavNode::Document { label, .. } => label.clone(),
            NavNode::Folder { label, .. } => format!("{label}/"),
        };
        lines.push(format!("{}{}", indent(depth), label));
    });
    lines
}

/// Tags with their entry counts; empty when no document is tagged.
pub fn format_tags(tags: &TagIndex) -> Vec<String> {
    if tags.is_empty() {
        return Vec::new();
    }
    let mut lines = vec!["Tags".to_string()];
    for (tag, entries) in tags.iter() {
        lines.push(format!("{} ({})", tag, entries.len()));
    }
    lines
}

/// Warning block; empty when the run was clean.
pub fn format_warnings(warnings: &Warnings) -> Vec<String> {
    if warnings.is_empty() {
        return Vec::new();
    }
    let mut lines = vec!["Warnings".to_string()];
    lines.extend(warnings.iter().map(ToString::to_string));
    lines
}

/// One-line run summary, with the output path when a file was written.
pub fn format_summary(conversion: &Conversion, output: Option<&Path>) -> String {
    let summary = format!(
        "Converted {}, {}, {}",
        plural(conversion.documents.len(), "document", "documents"),
        plural(conversion.tags.len(), "tag", "tags"),
        plural(conversion.warnings.len(), "warning", "warnings"),
    );
    match output {
        Some(path) => format!("{summary} → {}", path.display()),
        None => summary,
    }
}

/// Full report: inventory blocks separated by blank lines, then the summary.
pub fn format_conversion(conversion: &Conversion, output: Option<&Path>) -> Vec<String> {
    let blocks = [
        format_documents(conversion),
        format_navigation(&conversion.navigation),
        format_tags(&conversion.tags),
        format_warnings(&conversion.warnings),
    ];
    let mut lines = Vec::new();
    for block in blocks.into_iter().filter(|b| !b.is_empty()) {
        lines.extend(block);
        lines.push(String::new());
    }
    lines.push(format_summary(conversion, output));
    lines
}

pub fn print_conversion(conversion: &Conversion, output: Option<&Path>) {
    for line in format_conversion(conversion, output) {
        println!("{}", line);
    }
}
