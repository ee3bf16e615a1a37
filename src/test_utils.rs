//! Shared test utilities for maestro-links.
//!
//! This module provides common fixtures used across multiple test modules.
//! It is only compiled when running tests.

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::tree::{FileTreeNode, PathIndex};

/// In-memory project tree used by most resolver tests.
///
/// ```text
/// Notes/
/// ├── TODO.md
/// └── daily/
///     └── 2024-01-01.md
/// docs/
/// ├── guide.md
/// ├── notes.md
/// └── diagram.png
/// src/
/// ├── main.rs
/// └── notes.md
/// README.md
/// ```
///
/// `notes.md` exists twice on purpose, for proximity tie-breaking.
pub fn sample_tree() -> Vec<FileTreeNode> {
    vec![
        FileTreeNode::folder(
            "Notes",
            vec![
                FileTreeNode::file("TODO.md"),
                FileTreeNode::folder("daily", vec![FileTreeNode::file("2024-01-01.md")]),
            ],
        ),
        FileTreeNode::folder(
            "docs",
            vec![
                FileTreeNode::file("guide.md"),
                FileTreeNode::file("notes.md"),
                FileTreeNode::file("diagram.png"),
            ],
        ),
        FileTreeNode::folder(
            "src",
            vec![FileTreeNode::file("main.rs"), FileTreeNode::file("notes.md")],
        ),
        FileTreeNode::file("README.md"),
    ]
}

pub fn sample_index() -> PathIndex {
    PathIndex::new(&sample_tree())
}

/// Writes the [`sample_tree`] layout to a temporary directory.
///
/// Returns a tuple of (TempDir, PathBuf) where:
/// - TempDir: The temp directory handle (must be kept alive for the test duration)
/// - PathBuf: The path to the project subdirectory
///
/// The project lives in a non-hidden `project` subdirectory because temp
/// directories are sometimes created under dot-prefixed paths.
pub fn create_test_project() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let project_dir = temp_dir.path().join("project");

    fs::create_dir_all(project_dir.join("Notes/daily")).expect("Failed to create Notes/daily/");
    fs::create_dir(project_dir.join("docs")).expect("Failed to create docs/");
    fs::create_dir(project_dir.join("src")).expect("Failed to create src/");

    for (path, contents) in [
        ("Notes/TODO.md", "# TODO\n\n- write docs"),
        ("Notes/daily/2024-01-01.md", "# 2024-01-01"),
        ("docs/guide.md", "# Guide\n\nSee [[TODO]]."),
        ("docs/notes.md", "# Docs notes"),
        ("docs/diagram.png", ""),
        ("src/main.rs", "fn main() {}"),
        ("src/notes.md", "# Source notes"),
        ("README.md", "# Readme"),
    ] {
        fs::write(project_dir.join(path), contents)
            .unwrap_or_else(|_| panic!("Failed to write {path}"));
    }

    (temp_dir, project_dir)
}
