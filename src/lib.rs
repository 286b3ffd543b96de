//! # wikifold
//!
//! Folds a directory of markdown documents into one self-contained HTML file:
//! a sidebar that mirrors the folder tree, one section per document, and a few
//! lines of embedded JavaScript to switch between them. The result can be
//! mailed, attached to a ticket or opened from `file://` without a server.
//!
//! # Architecture: Document Assembly Pipeline
//!
//! ```text
//! 1. Load       docs/      →  DocumentSequence   (index.md first, then path order)
//! 2. Process    sequence   →  Conversion         (per document, in parallel)
//!      frontmatter → fences → markdown events → links → heading ids → TOC
//!    + navigation tree and tag index
//! 3. Generate   Conversion →  index.html         (single page, inline CSS/JS)
//! ```
//!
//! Every stage after loading is infallible: a broken frontmatter block or a
//! link that can't be resolved becomes a [`diagnostics::Warning`] and the run
//! continues. Only a missing root, an empty root or a missing `index.md`
//! aborts.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`load`] | Discovers markdown files and fixes the document order |
//! | [`frontmatter`] | Splits the optional YAML block from the markdown body |
//! | [`render`] | Fence normalization and markdown → event [`render::Fragment`] |
//! | [`slug`] | Per-document heading slugs |
//! | [`links`] | Rewrites links between markdown files into section triggers |
//! | [`headings`] | Namespaces heading ids by document ordinal |
//! | [`toc`] | Per-document table of contents |
//! | [`nav`] | Folder tree for the sidebar |
//! | [`tags`] | Tag → documents index |
//! | [`process`] | Runs the per-document pipeline and folds the results |
//! | [`generate`] | Renders the final page using Maud |
//! | [`config`] | `wikifold.toml` loading, validation, merging and CSS generation |
//! | [`naming`] | Display titles from file and folder names |
//! | [`diagnostics`] | Recoverable warnings collected during a run |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Events, Not Markup
//!
//! Documents are rendered with `pulldown-cmark` into an event stream, and the
//! rewriting stages (link resolution, heading namespacing, TOC extraction)
//! work on those events. HTML is produced once per document at the end, so
//! no stage ever pattern-matches serialized markup.
//!
//! ## Ordinals as Addresses
//!
//! A document's position in the sequence is its address everywhere: section
//! ids (`section-3`), heading ids (`section-3_overview`), link triggers and
//! tag entries. The order is a pure function of the set of relative paths, so
//! the same input always produces the same page.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system. Malformed templates are build errors, and every
//! interpolated title, label and tag is escaped by default.

pub mod config;
pub mod diagnostics;
pub mod frontmatter;
pub mod generate;
pub mod headings;
pub mod links;
pub mod load;
pub mod naming;
pub mod nav;
pub mod output;
pub mod process;
pub mod render;
pub mod slug;
pub mod tags;
pub mod toc;

pub use process::{Conversion, convert};

#[cfg(test)]
pub(crate) mod test_helpers;
