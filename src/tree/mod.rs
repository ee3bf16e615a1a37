//! Flattened lookup structures over a project file tree.
//!
//! The caller hands over a hierarchical snapshot of the project
//! ([`FileTreeNode`]). Resolution never looks at the hierarchy directly; it
//! works on the flat [`PathIndex`] built from it:
//!
//! - `entries`: one [`PathIndexEntry`] per file, depth-first in input order
//! - `by_filename`: bare filename (and `.md`-less filename) to every path
//!   carrying that name
//! - `all_paths`: membership set for exact path lookups
//!
//! Folder nodes never produce entries of their own.

mod walk;

pub use walk::read_tree;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Kind of a [`FileTreeNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

/// One node of the project's directory structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileTreeNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileTreeNode>>,
}

impl FileTreeNode {
    pub fn file(name: impl Into<String>) -> FileTreeNode {
        FileTreeNode {
            name: name.into(),
            kind: NodeKind::File,
            children: None,
        }
    }

    pub fn folder(name: impl Into<String>, children: Vec<FileTreeNode>) -> FileTreeNode {
        FileTreeNode {
            name: name.into(),
            kind: NodeKind::Folder,
            children: Some(children),
        }
    }
}

/// A file in the flattened index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathIndexEntry {
    /// Slash-joined path from the tree root
    pub relative_path: String,
    pub filename: String,
}

/// Bare filename (or `.md`-less filename) to the relative paths sharing it.
///
/// Paths under one key keep index-build order, which is what proximity
/// ties fall back to.
pub type FilenameIndex = HashMap<String, Vec<String>>;

fn join(base_path: &str, name: &str) -> String {
    if base_path.is_empty() {
        name.to_string()
    } else {
        format!("{base_path}/{name}")
    }
}

/// Flattens `tree` into one entry per file, depth-first, left to right.
pub fn build_index(tree: &[FileTreeNode], base_path: &str) -> Vec<PathIndexEntry> {
    let mut entries = vec![];
    collect_entries(tree, base_path, &mut entries);
    entries
}

fn collect_entries(tree: &[FileTreeNode], base_path: &str, entries: &mut Vec<PathIndexEntry>) {
    for node in tree {
        let path = join(base_path, &node.name);
        match node.kind {
            NodeKind::Folder => {
                if let Some(children) = &node.children {
                    collect_entries(children, &path, entries);
                }
            }
            NodeKind::File => entries.push(PathIndexEntry {
                relative_path: path,
                filename: node.name.clone(),
            }),
        }
    }
}

/// Registers every entry under its filename, and `.md` files additionally
/// under their name without the extension.
pub fn build_filename_index(entries: &[PathIndexEntry]) -> FilenameIndex {
    let mut index = FilenameIndex::new();

    for entry in entries {
        index
            .entry(entry.filename.clone())
            .or_default()
            .push(entry.relative_path.clone());

        if let Some(stem) = entry.filename.strip_suffix(".md") {
            index
                .entry(stem.to_string())
                .or_default()
                .push(entry.relative_path.clone());
        }
    }

    index
}

/// All lookup structures for one tree snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathIndex {
    entries: Vec<PathIndexEntry>,
    by_filename: FilenameIndex,
    all_paths: HashSet<String>,
}

impl PathIndex {
    pub fn new(tree: &[FileTreeNode]) -> PathIndex {
        let entries = build_index(tree, "");
        let by_filename = build_filename_index(&entries);
        let all_paths = entries
            .iter()
            .map(|entry| entry.relative_path.clone())
            .collect();

        PathIndex {
            entries,
            by_filename,
            all_paths,
        }
    }

    pub fn entries(&self) -> &[PathIndexEntry] {
        &self.entries
    }

    pub fn contains(&self, relative_path: &str) -> bool {
        self.all_paths.contains(relative_path)
    }

    /// Paths registered under `filename`, in index-build order.
    pub fn candidates(&self, filename: &str) -> &[String] {
        self.by_filename
            .get(filename)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_tree;

    #[test]
    fn empty_tree_builds_empty_index() {
        assert!(build_index(&[], "").is_empty());
        assert!(PathIndex::new(&[]).is_empty());
    }

    #[test]
    fn only_files_are_emitted_in_depth_first_order() {
        let entries = build_index(&sample_tree(), "");
        let paths: Vec<_> = entries.iter().map(|e| e.relative_path.as_str()).collect();

        assert_eq!(
            paths,
            vec![
                "Notes/TODO.md",
                "Notes/daily/2024-01-01.md",
                "docs/guide.md",
                "docs/notes.md",
                "docs/diagram.png",
                "src/main.rs",
                "src/notes.md",
                "README.md",
            ]
        );
        assert_eq!(entries[0].filename, "TODO.md");
    }

    #[test]
    fn base_path_prefixes_every_entry() {
        let tree = vec![FileTreeNode::folder("a", vec![FileTreeNode::file("b.txt")])];
        let entries = build_index(&tree, "root");

        assert_eq!(entries[0].relative_path, "root/a/b.txt");
    }

    #[test]
    fn folder_without_children_contributes_nothing() {
        let tree = vec![
            FileTreeNode {
                name: "empty".into(),
                kind: NodeKind::Folder,
                children: None,
            },
            FileTreeNode::file("x.md"),
        ];

        assert_eq!(build_index(&tree, "").len(), 1);
    }

    #[test]
    fn markdown_files_register_without_extension() {
        let entries = build_index(&sample_tree(), "");
        let index = build_filename_index(&entries);

        assert_eq!(index["TODO"], vec!["Notes/TODO.md".to_string()]);
        assert_eq!(index["TODO.md"], vec!["Notes/TODO.md".to_string()]);
        assert_eq!(
            index["notes"],
            vec!["docs/notes.md".to_string(), "src/notes.md".to_string()]
        );
        assert!(!index.contains_key("main"));
    }

    #[test]
    fn path_index_membership() {
        let index = PathIndex::new(&sample_tree());

        assert!(index.contains("docs/guide.md"));
        assert!(!index.contains("docs/guide"));
        assert!(!index.contains("docs"));
        assert!(index.candidates("missing.md").is_empty());
    }

    #[test]
    fn tree_deserializes_from_json() {
        let json = r#"[{"name":"Notes","type":"folder","children":[{"name":"TODO.md","type":"file"}]}]"#;
        let tree: Vec<FileTreeNode> = serde_json::from_str(json).unwrap();

        assert_eq!(
            tree,
            vec![FileTreeNode::folder("Notes", vec![FileTreeNode::file("TODO.md")])]
        );
    }
}
