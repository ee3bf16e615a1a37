use std::path::Path;

use anyhow::Context;
use tracing::debug;
use walkdir::WalkDir;

use super::FileTreeNode;

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Reads the directory at `root` into a [`FileTreeNode`] forest.
///
/// Siblings are ordered by file name so the resulting index is stable
/// across platforms. With `ignore_hidden`, dot-prefixed entries (and
/// everything below them) are skipped.
pub fn read_tree(root: &Path, ignore_hidden: bool) -> anyhow::Result<Vec<FileTreeNode>> {
    if !root.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }

    let mut nodes = vec![];

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            !(ignore_hidden && e.file_name().to_str().map(is_hidden).unwrap_or(false))
        });

    for entry in walker {
        let entry = entry.with_context(|| format!("Can't read directory {}", root.display()))?;
        let name = entry.file_name().to_string_lossy().to_string();

        if entry.file_type().is_dir() {
            let children = read_tree(entry.path(), ignore_hidden)?;
            nodes.push(FileTreeNode::folder(name, children));
        } else {
            nodes.push(FileTreeNode::file(name));
        }
    }

    debug!(root = %root.display(), nodes = nodes.len(), "read file tree level");

    Ok(nodes)
}
