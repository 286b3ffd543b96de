//! Navigation tree.
//!
//! Mirrors the folder structure of the input root. The tree is rebuilt from
//! relative paths alone, so each folder is keyed by its full ancestor path:
//! `api/docs` and `guide/docs` are different folders even though both are
//! labelled "Docs".
//!
//! ## Ordering
//!
//! At every level, documents come first in sequence order, then subfolders in
//! the order their first document appears. A root-level entry document is
//! therefore always the first node.
//!
//! ```text
//! index.md                    ├── Index
//! notes.md                    ├── Notes
//! guide/setup.md        →     ├── Guide/
//! guide/deep/tuning.md        │   ├── Setup
//! api/docs/http.md            │   └── Deep/
//!                             │       └── Tuning
//!                             └── Api/
//!                                 └── Docs/
//!                                     └── Http
//! ```
//!
//! ## Folder ids
//!
//! Folder ids become element ids in the page, so they must be unique and safe
//! inside an `id` attribute and a JS string. Each path segment keeps its ASCII
//! alphanumerics and escapes every other byte as `_XX` (uppercase hex), and
//! segments are joined with `-`. Since `-` and `_` are always escaped inside a
//! segment, distinct paths can't produce the same id.

use crate::load::DocumentSequence;
use crate::naming;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NavNode {
    Document {
        ordinal: usize,
        label: String,
    },
    Folder {
        label: String,
        id: String,
        children: Vec<NavNode>,
    },
}

impl NavNode {
    pub fn label(&self) -> &str {
        match self {
            NavNode::Document { label, .. } | NavNode::Folder { label, .. } => label,
        }
    }
}

/// Folder under construction; children stay split until the folder is finished.
#[derive(Debug, Default)]
struct FolderBuilder {
    segment: String,
    path: Vec<String>,
    documents: Vec<NavNode>,
    folders: Vec<FolderBuilder>,
}

impl FolderBuilder {
    fn child(&mut self, segment: &str) -> &mut FolderBuilder {
        let pos = match self.folders.iter().position(|f| f.segment == segment) {
            Some(pos) => pos,
            None => {
                let mut path = self.path.clone();
                path.push(segment.to_string());
                self.folders.push(FolderBuilder {
                    segment: segment.to_string(),
                    path,
                    ..Default::default()
                });
                self.folders.len() - 1
            }
        };
        &mut self.folders[pos]
    }

    fn into_children(self) -> Vec<NavNode> {
        let mut children = self.documents;
        children.extend(self.folders.into_iter().map(FolderBuilder::finish));
        children
    }

    fn finish(self) -> NavNode {
        NavNode::Folder {
            label: naming::display_title(&self.segment),
            id: folder_id(&self.path),
            children: self.into_children(),
        }
    }
}

/// Build the root-level navigation nodes for a sequence.
pub fn build(sequence: &DocumentSequence) -> Vec<NavNode> {
    let mut root = FolderBuilder::default();
    for doc in sequence.iter() {
        let mut folder = &mut root;
        if let Some((dirs, _)) = doc.rel_path.rsplit_once('/') {
            for segment in dirs.split('/') {
                folder = folder.child(segment);
            }
        }
        folder.documents.push(NavNode::Document {
            ordinal: doc.ordinal,
            label: naming::nav_label(&doc.rel_path),
        });
    }
    root.into_children()
}

/// Element id for the folder at `path` (segments from the root).
pub fn folder_id(path: &[String]) -> String {
    let segments: Vec<String> = path.iter().map(|s| escape_segment(s)).collect();
    format!("folder-{}", segments.join("-"))
}

fn escape_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for b in segment.bytes() {
        if b.is_ascii_alphanumeric() {
            out.push(b as char);
        } else {
            out.push_str(&format!("_{b:02X}"));
        }
    }
    out
}

/// Depth-first walk yielding each node with its depth (0 for root level).
pub fn walk(nodes: &[NavNode], visit: &mut impl FnMut(&NavNode, usize)) {
    fn go(nodes: &[NavNode], depth: usize, visit: &mut impl FnMut(&NavNode, usize)) {
        for node in nodes {
            visit(node, depth);
            if let NavNode::Folder { children, .. } = node {
                go(children, depth + 1, visit);
            }
        }
    }
    go(nodes, 0, visit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sequence(paths: &[&str]) -> DocumentSequence {
        DocumentSequence::from_sources(
            "docs",
            paths
                .iter()
                .map(|p| (p.to_string(), String::new()))
                .collect(),
        )
    }

    fn outline(nodes: &[NavNode]) -> Vec<String> {
        let mut lines = Vec::new();
        walk(nodes, &mut |node, depth| {
            let line = match node {
                NavNode::Document { ordinal, label } => format!("{label} #{ordinal}"),
                NavNode::Folder { label, .. } => format!("{label}/"),
            };
            lines.push(format!("{}{line}", "  ".repeat(depth)));
        });
        lines
    }

    fn folder_ids(nodes: &[NavNode]) -> Vec<String> {
        let mut ids = Vec::new();
        walk(nodes, &mut |node, _| {
            if let NavNode::Folder { id, .. } = node {
                ids.push(id.clone());
            }
        });
        ids
    }

    #[test]
    fn flat_root_keeps_sequence_order() {
        let nav = build(&sequence(&["index.md", "a.md", "b.md"]));
        assert_eq!(outline(&nav), vec!["Index #0", "A #1", "B #2"]);
    }

    #[test]
    fn documents_before_folders_at_every_level() {
        let nav = build(&sequence(&[
            "index.md",
            "guide/deep/tuning.md",
            "guide/setup.md",
            "notes.md",
            "api/docs/http.md",
        ]));
        assert_eq!(
            outline(&nav),
            vec![
                "Index #0",
                "Notes #3",
                "Guide/",
                "  Setup #2",
                "  Deep/",
                "    Tuning #1",
                "Api/",
                "  Docs/",
                "    Http #4",
            ]
        );
    }

    #[test]
    fn nested_entry_stays_in_its_folder() {
        let nav = build(&sequence(&["guide/index.md", "a.md"]));
        assert_eq!(outline(&nav), vec!["A #1", "Guide/", "  Index #0"]);
    }

    #[test]
    fn every_document_appears_exactly_once() {
        let paths = ["index.md", "x/a.md", "x/y/b.md", "z/c.md", "d.md", "x/y/z/e.md"];
        let nav = build(&sequence(&paths));
        let mut seen = Vec::new();
        walk(&nav, &mut |node, _| {
            if let NavNode::Document { ordinal, .. } = node {
                seen.push(*ordinal);
            }
        });
        seen.sort();
        assert_eq!(seen, (0..paths.len()).collect::<Vec<_>>());
    }

    #[test]
    fn same_folder_name_under_different_parents() {
        let nav = build(&sequence(&["index.md", "api/docs/a.md", "guide/docs/b.md"]));
        let ids = folder_ids(&nav);
        assert_eq!(
            ids,
            vec!["folder-api", "folder-api-docs", "folder-guide", "folder-guide-docs"]
        );
        assert_eq!(outline(&nav)[2], "  Docs/");
        assert_eq!(outline(&nav)[5], "  Docs/");
    }

    #[test]
    fn folder_ids_escape_separators() {
        let path = |segs: &[&str]| segs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(folder_id(&path(&["my docs"])), "folder-my_20docs");
        assert_eq!(folder_id(&path(&["a-b"])), "folder-a_2Db");
        assert_eq!(folder_id(&path(&["a_b"])), "folder-a_5Fb");
        assert_ne!(folder_id(&path(&["a-b"])), folder_id(&path(&["a", "b"])));
        assert_ne!(folder_id(&path(&["a_b"])), folder_id(&path(&["a", "b"])));
    }

    #[test]
    fn folder_ids_are_unique_and_attribute_safe() {
        let nav = build(&sequence(&[
            "index.md",
            "a/b/x.md",
            "a-b/x.md",
            "a_b/x.md",
            "a/b-c/x.md",
            "naïve/x.md",
        ]));
        let ids = folder_ids(&nav);
        let unique: HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        for id in &ids {
            assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'), "{id}");
        }
    }

    #[test]
    fn folder_labels_are_display_titles() {
        let nav = build(&sequence(&["index.md", "api_reference/http-client.md"]));
        assert_eq!(outline(&nav), vec!["Index #0", "Api Reference/", "  Http Client #1"]);
    }
}
