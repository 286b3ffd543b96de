//! Recoverable anomalies collected during a run.
//!
//! Only loader failures abort a conversion. Everything else (a broken
//! frontmatter block, a link nobody can resolve, a file that can't be read)
//! degrades to a safe default and is recorded here so the CLI can report it
//! next to an otherwise successful result.

use std::fmt;

/// A non-fatal problem attached to one source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Frontmatter present but unusable; the document got an empty mapping.
    Frontmatter { path: String, reason: String },
    /// A markdown-to-markdown link matched no document by path or by name.
    UnresolvedLink { path: String, href: String },
    /// The file could not be read; the document was kept with empty text.
    Unreadable { path: String, reason: String },
}

impl Warning {
    /// Relative path of the document the warning belongs to.
    pub fn path(&self) -> &str {
        match self {
            Warning::Frontmatter { path, .. }
            | Warning::UnresolvedLink { path, .. }
            | Warning::Unreadable { path, .. } => path,
        }
    }

    /// Emit through the `log` facade. Called once, where the warning is produced.
    pub(crate) fn log(&self) {
        log::warn!("{self}");
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::Frontmatter { path, reason } => {
                write!(f, "{path}: ignoring frontmatter: {reason}")
            }
            Warning::UnresolvedLink { path, href } => {
                write!(f, "{path}: could not resolve link '{href}'")
            }
            Warning::Unreadable { path, reason } => {
                write!(f, "{path}: could not read file: {reason}")
            }
        }
    }
}

/// Ordered collection of warnings for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warnings {
    items: Vec<Warning>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and log it.
    pub fn push(&mut self, warning: Warning) {
        warning.log();
        self.items.push(warning);
    }

    /// Append already-logged warnings, preserving their order.
    pub fn extend(&mut self, other: Warnings) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Warning> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a Warnings {
    type Item = &'a Warning;
    type IntoIter = std::slice::Iter<'a, Warning>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
