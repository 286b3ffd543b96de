//! Markdown discovery and ordering.
//!
//! Stage 1 of the pipeline. Walks the input root, keeps every file with a
//! markdown extension, and fixes the order every later stage relies on:
//!
//! ```text
//! docs/                      ordinal
//! ├── index.md               0   entry document, always first
//! ├── changelog.md           1   then lexicographic by relative path
//! ├── guide/
//! │   ├── install.md         2
//! │   └── setup.md           3
//! └── reference.md           4
//! ```
//!
//! ## Ordering
//!
//! Relative paths are compared as strings after normalizing separators to
//! `/`, so the sequence is a pure function of the set of paths: the order in
//! which the filesystem happens to return entries never leaks into the output,
//! and Windows and Unix runs agree.
//!
//! ## Entry document
//!
//! One file named `index.md` or `index.markdown` (case-insensitive) is
//! required. When several exist, the shallowest wins and ties fall back to
//! path order; the others are kept as ordinary documents.
//!
//! ## Failures
//!
//! Only this stage can abort a run: a missing root, a root without markdown,
//! or a root without an entry document. A file that exists but can't be read
//! becomes an empty document plus a [`Warning::Unreadable`]. Symlinks are
//! followed; a folder the walk can't enter, a dangling link or a link cycle
//! is skipped with the same warning.

use crate::diagnostics::{Warning, Warnings};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Input folder does not exist: {0}")]
    RootNotFound(PathBuf),
    #[error("Input path is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("No markdown files found in {0}")]
    NoMarkdownFiles(PathBuf),
    #[error(
        "index.md is required but was not found in {0}; create one as the entry point of the documentation"
    )]
    MissingEntry(PathBuf),
}

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];
const ENTRY_NAMES: &[&str] = &["index.md", "index.markdown"];

/// A markdown file as discovered on disk.
#[derive(Debug, Clone)]
pub struct Document {
    /// Position in the merged sequence; the addressing scheme for cross-references.
    pub ordinal: usize,
    /// Path relative to the input root, `/`-separated.
    pub rel_path: String,
    /// Full path on disk.
    pub source: PathBuf,
    /// File contents (empty if the file could not be read).
    pub raw: String,
}

/// All documents of one run, entry document first.
///
/// Invariant: `documents[i].ordinal == i`. Sequences returned by [`load`] are
/// never empty.
#[derive(Debug, Clone)]
pub struct DocumentSequence {
    root: PathBuf,
    documents: Vec<Document>,
}

impl DocumentSequence {
    /// Build a sequence from already-ordered `(rel_path, raw)` pairs.
    ///
    /// The first pair becomes the entry document. Used by tests and by callers
    /// that produce markdown without a filesystem.
    pub fn from_sources(root: impl Into<PathBuf>, sources: Vec<(String, String)>) -> Self {
        let root = root.into();
        let documents = sources
            .into_iter()
            .enumerate()
            .map(|(ordinal, (rel_path, raw))| Document {
                ordinal,
                source: root.join(&rel_path),
                rel_path,
                raw,
            })
            .collect();
        Self { root, documents }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn get(&self, ordinal: usize) -> Option<&Document> {
        self.documents.get(ordinal)
    }

    /// The entry document; `None` only for a sequence built from no sources.
    pub fn entry(&self) -> Option<&Document> {
        self.documents.first()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }
}

/// Result of loading: the ordered sequence plus any per-file read warnings.
#[derive(Debug)]
pub struct Loaded {
    pub sequence: DocumentSequence,
    pub warnings: Warnings,
}

/// Discover, order and read every markdown document under `root`.
pub fn load(root: &Path) -> Result<Loaded, LoadError> {
    let (rel_paths, mut warnings) = discover(root)?;
    let ordered = order(root, rel_paths)?;
    log::debug!("loaded {} markdown files from {}", ordered.len(), root.display());

    let mut documents = Vec::with_capacity(ordered.len());
    for (ordinal, rel_path) in ordered.into_iter().enumerate() {
        let source = root.join(&rel_path);
        let raw = match fs::read_to_string(&source) {
            Ok(raw) => raw,
            Err(err) => {
                warnings.push(Warning::Unreadable {
                    path: rel_path.clone(),
                    reason: err.to_string(),
                });
                String::new()
            }
        };
        documents.push(Document {
            ordinal,
            rel_path,
            source,
            raw,
        });
    }

    Ok(Loaded {
        sequence: DocumentSequence {
            root: root.to_path_buf(),
            documents,
        },
        warnings,
    })
}

/// Recursively list markdown files under `root` as `/`-separated relative paths.
///
/// Entries the walk fails on are skipped and reported as warnings.
pub fn discover(root: &Path) -> Result<(Vec<String>, Warnings), LoadError> {
    if !root.exists() {
        return Err(LoadError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(LoadError::NotADirectory(root.to_path_buf()));
    }

    let mut rel_paths = Vec::new();
    let mut warnings = Warnings::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .and_then(|p| p.strip_prefix(root).ok())
                    .map(normalize_rel_path)
                    .unwrap_or_else(|| root.display().to_string());
                warnings.push(Warning::Unreadable {
                    path,
                    reason: err.to_string(),
                });
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(root) {
            rel_paths.push(normalize_rel_path(rel));
        }
    }

    if rel_paths.is_empty() {
        return Err(LoadError::NoMarkdownFiles(root.to_path_buf()));
    }
    Ok((rel_paths, warnings))
}

/// Put the entry document first and sort everything else by path.
///
/// Pure over the input set: any permutation of `rel_paths` yields the same result.
pub fn order(root: &Path, mut rel_paths: Vec<String>) -> Result<Vec<String>, LoadError> {
    if rel_paths.is_empty() {
        return Err(LoadError::NoMarkdownFiles(root.to_path_buf()));
    }
    rel_paths.sort();

    let entry = rel_paths
        .iter()
        .enumerate()
        .filter(|(_, p)| is_entry_name(p))
        .min_by_key(|(_, p)| p.matches('/').count())
        .map(|(i, _)| i)
        .ok_or_else(|| LoadError::MissingEntry(root.to_path_buf()))?;

    let entry = rel_paths.remove(entry);
    let mut ordered = Vec::with_capacity(rel_paths.len() + 1);
    ordered.push(entry);
    ordered.extend(rel_paths);
    Ok(ordered)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|md| ext.eq_ignore_ascii_case(md))
        })
        .unwrap_or(false)
}

fn is_entry_name(rel_path: &str) -> bool {
    let name = crate::naming::file_name(rel_path).to_lowercase();
    ENTRY_NAMES.contains(&name.as_str())
}

/// Join path components with `/` regardless of the platform separator.
fn normalize_rel_path(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{setup_fixtures, write_tree};
    use tempfile::TempDir;

    fn paths(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    // =========================================================================
    // Ordering
    // =========================================================================

    #[test]
    fn entry_document_is_first() {
        let ordered = order(
            Path::new("docs"),
            paths(&["b.md", "a.md", "index.md", "guide/setup.md"]),
        )
        .unwrap();
        assert_eq!(ordered, paths(&["index.md", "a.md", "b.md", "guide/setup.md"]));
    }

    #[test]
    fn ordering_ignores_discovery_order() {
        let set = ["zeta.md", "index.md", "guide/b.md", "guide/a.md", "alpha.md"];
        let forward = order(Path::new("docs"), paths(&set)).unwrap();
        let mut reversed = paths(&set);
        reversed.reverse();
        let backward = order(Path::new("docs"), reversed).unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn ordering_is_bytewise() {
        let ordered = order(
            Path::new("docs"),
            paths(&["index.md", "b.md", "B.md", "a-b.md", "a/b.md"]),
        )
        .unwrap();
        // '-' (0x2D) < '/' (0x2F) and uppercase sorts before lowercase
        assert_eq!(
            ordered,
            paths(&["index.md", "B.md", "a-b.md", "a/b.md", "b.md"])
        );
    }

    #[test]
    fn entry_name_is_case_insensitive() {
        let ordered = order(Path::new("docs"), paths(&["a.md", "INDEX.MD"])).unwrap();
        assert_eq!(ordered[0], "INDEX.MD");

        let ordered = order(Path::new("docs"), paths(&["a.md", "Index.markdown"])).unwrap();
        assert_eq!(ordered[0], "Index.markdown");
    }

    #[test]
    fn shallowest_index_wins() {
        let ordered = order(
            Path::new("docs"),
            paths(&["guide/index.md", "index.md", "api/index.md"]),
        )
        .unwrap();
        assert_eq!(ordered, paths(&["index.md", "api/index.md", "guide/index.md"]));
    }

    #[test]
    fn nested_index_is_accepted_as_entry() {
        let ordered = order(Path::new("docs"), paths(&["a.md", "guide/index.md"])).unwrap();
        assert_eq!(ordered, paths(&["guide/index.md", "a.md"]));
    }

    #[test]
    fn missing_entry_is_error() {
        let result = order(Path::new("docs"), paths(&["a.md", "indexes.md"]));
        assert!(matches!(result, Err(LoadError::MissingEntry(_))));
    }

    // =========================================================================
    // Filesystem discovery
    // =========================================================================

    #[test]
    fn missing_root_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = load(&tmp.path().join("nope"));
        assert!(matches!(result, Err(LoadError::RootNotFound(_))));
    }

    #[test]
    fn file_root_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("index.md");
        std::fs::write(&file, "# Hi").unwrap();
        let result = load(&file);
        assert!(matches!(result, Err(LoadError::NotADirectory(_))));
    }

    #[test]
    fn empty_root_has_no_markdown() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("notes.txt", "plain"), ("img/logo.png", "")]);
        let result = load(tmp.path());
        assert!(matches!(result, Err(LoadError::NoMarkdownFiles(_))));
    }

    #[test]
    fn root_without_index_fails_validation() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("readme.md", "# Readme")]);
        let result = load(tmp.path());
        assert!(matches!(result, Err(LoadError::MissingEntry(_))));
    }

    #[test]
    fn discovers_both_extensions_recursively() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[
                ("index.md", "# Home"),
                ("guide/setup.MD", "# Setup"),
                ("guide/deep/notes.markdown", "# Notes"),
                ("guide/skip.txt", "not markdown"),
            ],
        );

        let loaded = load(tmp.path()).unwrap();
        let rel: Vec<&str> = loaded
            .sequence
            .iter()
            .map(|d| d.rel_path.as_str())
            .collect();
        assert_eq!(
            rel,
            vec!["index.md", "guide/deep/notes.markdown", "guide/setup.MD"]
        );
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn ordinals_are_contiguous_and_match_position() {
        let tmp = setup_fixtures();
        let loaded = load(tmp.path()).unwrap();

        assert!(loaded.sequence.len() > 1);
        for (i, doc) in loaded.sequence.iter().enumerate() {
            assert_eq!(doc.ordinal, i);
        }
        assert_eq!(loaded.sequence.entry().unwrap().rel_path, "index.md");
    }

    #[test]
    fn raw_text_is_read() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("index.md", "# Home\n\nWelcome.")]);
        let loaded = load(tmp.path()).unwrap();
        assert_eq!(loaded.sequence.entry().unwrap().raw, "# Home\n\nWelcome.");
        assert_eq!(loaded.sequence.entry().unwrap().source, tmp.path().join("index.md"));
    }

    #[test]
    fn invalid_utf8_is_a_warning_not_an_error() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("index.md", "# Home")]);
        std::fs::write(tmp.path().join("binary.md"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let loaded = load(tmp.path()).unwrap();
        assert_eq!(loaded.sequence.len(), 2);
        assert_eq!(loaded.sequence.get(1).unwrap().raw, "");
        assert_eq!(loaded.warnings.len(), 1);
        assert!(matches!(
            loaded.warnings.iter().next(),
            Some(Warning::Unreadable { path, .. }) if path == "binary.md"
        ));
    }

    #[test]
    #[cfg(unix)]
    fn dangling_symlink_is_skipped_with_warning() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("index.md", "# Home"), ("guide/setup.md", "# Setup")]);
        std::os::unix::fs::symlink(tmp.path().join("gone.md"), tmp.path().join("guide/ghost.md"))
            .unwrap();

        let loaded = load(tmp.path()).unwrap();
        let rel: Vec<&str> = loaded.sequence.iter().map(|d| d.rel_path.as_str()).collect();
        assert_eq!(rel, vec!["index.md", "guide/setup.md"]);
        assert!(matches!(
            loaded.warnings.iter().next(),
            Some(Warning::Unreadable { path, .. }) if path == "guide/ghost.md"
        ));
    }

    #[test]
    #[cfg(unix)]
    fn symlink_cycle_does_not_abort() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("index.md", "# Home"), ("guide/setup.md", "# Setup")]);
        std::os::unix::fs::symlink(tmp.path(), tmp.path().join("guide/loop")).unwrap();

        let loaded = load(tmp.path()).unwrap();
        assert_eq!(loaded.sequence.len(), 2);
        assert_eq!(loaded.warnings.len(), 1);
    }

    // =========================================================================
    // Sequences built in memory
    // =========================================================================

    #[test]
    fn empty_sequence_has_no_entry() {
        let seq = DocumentSequence::from_sources("docs", Vec::new());
        assert!(seq.is_empty());
        assert!(seq.entry().is_none());
    }

    #[test]
    fn from_sources_numbers_in_given_order() {
        let seq = DocumentSequence::from_sources(
            "docs",
            vec![
                ("index.md".to_string(), "# Home".to_string()),
                ("b.md".to_string(), String::new()),
            ],
        );
        assert_eq!(seq.entry().unwrap().rel_path, "index.md");
        assert_eq!(seq.get(1).unwrap().ordinal, 1);
        assert_eq!(seq.get(1).unwrap().source, Path::new("docs/b.md"));
    }
}
