//! Document assembly.
//!
//! Runs every loaded document through the per-document transformation and
//! folds the results into one [`Conversion`]:
//!
//! ```text
//! raw text ─→ frontmatter::split ─→ render::normalize_fences ─→ render::render
//!          ─→ links::resolve_links ─→ headings::namespace_headings ─→ toc::extract
//!          ─→ HTML
//! ```
//!
//! The navigation tree depends only on relative paths and is built alongside.
//!
//! ## Parallel Processing
//!
//! Documents only read shared, fully-built structures (the sequence and its
//! [`LinkTargets`]), so they are processed in parallel with
//! [rayon](https://docs.rs/rayon). Each one returns its own warnings and its own
//! small [`TagIndex`]; those are folded in ordinal order afterwards, which makes
//! the output byte-for-byte independent of scheduling.

use crate::diagnostics::{Warning, Warnings};
use crate::frontmatter::{self, Frontmatter};
use crate::headings;
use crate::links::{self, LinkTargets};
use crate::load::{self, Document, DocumentSequence, LoadError};
use crate::naming;
use crate::nav::{self, NavNode};
use crate::render;
use crate::tags::TagIndex;
use crate::toc::{self, Toc};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// One document, fully transformed and ready for assembly.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub ordinal: usize,
    pub rel_path: String,
    /// Section header title ("Guide / Setup").
    pub title: String,
    /// Sidebar label ("Setup").
    pub nav_label: String,
    pub frontmatter: Frontmatter,
    pub tags: Vec<String>,
    /// Rendered body with links resolved and heading ids namespaced.
    pub html: String,
    pub toc: Toc,
}

/// Everything the emit stage needs.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub root: PathBuf,
    /// In sequence order; `documents[i].ordinal == i`.
    pub documents: Vec<ProcessedDocument>,
    pub navigation: Vec<NavNode>,
    pub tags: TagIndex,
    pub warnings: Warnings,
}

impl Conversion {
    pub fn document(&self, ordinal: usize) -> Option<&ProcessedDocument> {
        self.documents.get(ordinal)
    }

    pub fn find(&self, rel_path: &str) -> Option<&ProcessedDocument> {
        self.documents.iter().find(|d| d.rel_path == rel_path)
    }
}

struct Outcome {
    document: ProcessedDocument,
    tags: TagIndex,
    warnings: Warnings,
}

/// Load `root` and process every document in it.
pub fn convert(root: &Path) -> Result<Conversion, LoadError> {
    let loaded = load::load(root)?;
    let mut conversion = process(&loaded.sequence);

    let mut warnings = loaded.warnings;
    warnings.extend(conversion.warnings);
    conversion.warnings = warnings;
    Ok(conversion)
}

/// Process an already-loaded sequence.
pub fn process(sequence: &DocumentSequence) -> Conversion {
    let targets = LinkTargets::new(sequence);

    let outcomes: Vec<Outcome> = sequence
        .documents()
        .par_iter()
        .map(|doc| process_document(doc, &targets))
        .collect();

    let mut documents = Vec::with_capacity(outcomes.len());
    let mut tags = TagIndex::new();
    let mut warnings = Warnings::new();
    for outcome in outcomes {
        tags.merge(outcome.tags);
        warnings.extend(outcome.warnings);
        documents.push(outcome.document);
    }

    log::debug!(
        "processed {} documents, {} tags, {} warnings",
        documents.len(),
        tags.len(),
        warnings.len()
    );

    Conversion {
        root: sequence.root().to_path_buf(),
        documents,
        navigation: nav::build(sequence),
        tags,
        warnings,
    }
}

fn process_document(doc: &Document, targets: &LinkTargets) -> Outcome {
    let mut warnings = Warnings::new();

    let split = frontmatter::split(&doc.raw);
    if let Some(problem) = &split.problem {
        warnings.push(Warning::Frontmatter {
            path: doc.rel_path.clone(),
            reason: problem.to_string(),
        });
    }

    let body = render::normalize_fences(&split.body);
    let mut fragment = render::render(&body);
    warnings.extend(links::resolve_links(&mut fragment, doc.ordinal, targets));
    headings::namespace_headings(&mut fragment, doc.ordinal);
    let toc = toc::extract(&fragment);
    let html = fragment.to_html();

    let title = naming::section_title(&doc.rel_path);
    let doc_tags = split.frontmatter.tags();
    let mut tags = TagIndex::new();
    tags.record(doc.ordinal, &title, &doc.rel_path, &doc_tags);

    Outcome {
        document: ProcessedDocument {
            ordinal: doc.ordinal,
            rel_path: doc.rel_path.clone(),
            title,
            nav_label: naming::nav_label(&doc.rel_path),
            frontmatter: split.frontmatter,
            tags: doc_tags,
            html,
            toc,
        },
        tags,
        warnings,
    }
}
