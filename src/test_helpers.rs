//! Shared test utilities for the wikifold test suite.
//!
//! Provides fixture setup, throwaway document trees, and lookup helpers over
//! a finished [`Conversion`].
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let conv = convert(tmp.path()).unwrap();
//!
//! let setup = find_document(&conv, "guide/setup.md");
//! assert_eq!(setup.title, "Guide / Setup");
//! assert_eq!(document_paths(&conv)[0], "index.md");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::process::{Conversion, ProcessedDocument};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/docs/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/docs");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `(relative path, contents)` pairs under `root`, creating folders.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, contents) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
    }
}

// =========================================================================
// Conversion lookups (panic with the available paths on a miss)
// =========================================================================

/// Find a processed document by relative path. Panics if not found.
pub fn find_document<'a>(conversion: &'a Conversion, rel_path: &str) -> &'a ProcessedDocument {
    conversion.find(rel_path).unwrap_or_else(|| {
        let paths = document_paths(conversion);
        panic!("document '{rel_path}' not found. Available: {paths:?}")
    })
}

/// All relative paths in sequence order.
pub fn document_paths(conversion: &Conversion) -> Vec<&str> {
    conversion
        .documents
        .iter()
        .map(|d| d.rel_path.as_str())
        .collect()
}

/// Ordinals listed under `tag`, in index order.
pub fn tag_ordinals(conversion: &Conversion, tag: &str) -> Vec<usize> {
    conversion.tags.get(tag).iter().map(|e| e.ordinal).collect()
}
