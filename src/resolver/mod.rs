//! Recognition and resolution of file references inside text.
//!
//! Four syntaxes are recognized, in priority order:
//!
//! | Syntax | Example | Resolved by |
//! |--------|---------|-------------|
//! | image embed | `![[diagram.png\|300]]` | closest match, else `<attachments>/<name>` next to `cwd` |
//! | wiki link | `[[Note]]`, `[[docs/Note\|text]]` | closest match |
//! | absolute path | `/proj/src/main.rs` | containment under the project root |
//! | relative path | `src/main.rs` | exact index membership |
//!
//! A candidate that overlaps an already accepted match is dropped, so an
//! image embed shadows the wiki link inside it, a wiki link shadows any
//! path inside it, and so on. References that do not resolve are left as
//! plain text; nothing here fails.

pub mod proximity;
mod scan;
mod spans;

pub use scan::{SyntaxKind, IMAGE_EXTENSIONS, TEXT_EXTENSIONS};

use std::ops::Range;

use tracing::{debug, trace};

use crate::config::Settings;
use crate::tree::PathIndex;

use self::scan::Candidate;
use self::spans::ClaimedSpans;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    Link,
    Image,
}

/// A recognized and validated reference, in byte offsets of the scanned text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub display: String,
    pub resolved_path: String,
    pub kind: MatchKind,
    /// Pixel width hint from `![[image.png|300]]`
    pub image_width: Option<u32>,
    /// `resolved_path` is relative to `cwd`, not to the tree root
    pub is_relative_to_cwd: bool,
    /// `resolved_path` was found in the file tree
    pub is_from_file_tree: bool,
}

impl Match {
    fn link(range: Range<usize>, display: &str, resolved_path: String) -> Match {
        Match {
            start: range.start,
            end: range.end,
            display: display.to_string(),
            resolved_path,
            kind: MatchKind::Link,
            image_width: None,
            is_relative_to_cwd: false,
            is_from_file_tree: false,
        }
    }
}

/// The last path segment of `path`.
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Resolves `reference` against the index.
///
/// Tried in order: the exact path, the path with `.md` appended, then every
/// file sharing the reference's filename (or `.md`-less filename). When the
/// reference carries directories, filename candidates must end with the
/// reference as a whole path suffix. Remaining duplicates are ranked by
/// [`proximity::score`] against `cwd`.
pub fn find_closest_match(reference: &str, index: &PathIndex, cwd: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    if index.contains(reference) {
        return Some(reference.to_string());
    }

    let with_md = format!("{reference}.md");
    if index.contains(&with_md) {
        return Some(with_md);
    }

    let candidates = index.candidates(basename(reference));

    let closest = if reference.contains('/') {
        let suffix = format!("/{reference}");
        let suffix_md = format!("/{reference}.md");
        proximity::closest(
            candidates
                .iter()
                .filter(|path| path.ends_with(&suffix) || path.ends_with(&suffix_md)),
            cwd,
        )
    } else {
        proximity::closest(candidates, cwd)
    };

    closest.map(String::from)
}

/// Everything a resolution pass needs besides the text itself.
#[derive(Debug, Clone)]
pub struct ResolutionContext<'a> {
    pub index: &'a PathIndex,
    /// Tree-relative directory of the referencing document
    pub cwd: &'a str,
    /// Absolute path the tree is rooted at
    pub project_root: Option<&'a str>,
    pub settings: Settings,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(index: &'a PathIndex, cwd: &'a str) -> ResolutionContext<'a> {
        ResolutionContext {
            index,
            cwd,
            project_root: None,
            settings: Settings::default(),
        }
    }

    pub fn with_project_root(self, project_root: &'a str) -> ResolutionContext<'a> {
        ResolutionContext {
            project_root: Some(project_root),
            ..self
        }
    }

    pub fn with_settings(self, settings: Settings) -> ResolutionContext<'a> {
        ResolutionContext { settings, ..self }
    }

    pub fn find_closest_match(&self, reference: &str) -> Option<String> {
        find_closest_match(reference, self.index, self.cwd)
    }

    /// `absolute` made relative to the project root, if it lies strictly under it.
    pub fn project_relative<'p>(&self, absolute: &'p str) -> Option<&'p str> {
        let root = self.project_root?.trim_end_matches('/');
        let relative = absolute.strip_prefix(root)?.strip_prefix('/')?;

        (!relative.is_empty()).then_some(relative)
    }

    /// Path of an image match relative to the tree root.
    pub fn image_path(&self, found: &Match) -> String {
        let cwd = self.cwd.trim_matches('/');
        if found.is_relative_to_cwd && !cwd.is_empty() {
            format!("{cwd}/{}", found.resolved_path)
        } else {
            found.resolved_path.clone()
        }
    }

    /// Exact index membership of `path` or `path.md`, ignoring a leading `./`.
    fn lookup_relative(&self, path: &str) -> Option<String> {
        let lookup = path.strip_prefix("./").unwrap_or(path);
        let with_md = format!("{lookup}.md");

        if self.index.contains(lookup) {
            Some(lookup.to_string())
        } else if self.index.contains(&with_md) {
            Some(with_md)
        } else {
            None
        }
    }

    fn resolve_candidate(&self, candidate: &Candidate) -> Option<Match> {
        match candidate.kind {
            SyntaxKind::ImageEmbed => {
                let (resolved_path, from_tree) = match self.find_closest_match(candidate.reference)
                {
                    Some(path) => (path, true),
                    None => {
                        debug!(
                            reference = candidate.reference,
                            folder = %self.settings.attachments_folder,
                            "image not in tree, assuming attachments folder"
                        );
                        (
                            format!(
                                "{}/{}",
                                self.settings.attachments_folder, candidate.reference
                            ),
                            false,
                        )
                    }
                };

                Some(Match {
                    start: candidate.range.start,
                    end: candidate.range.end,
                    display: candidate.reference.to_string(),
                    resolved_path,
                    kind: MatchKind::Image,
                    image_width: candidate.width,
                    is_relative_to_cwd: !from_tree,
                    is_from_file_tree: from_tree,
                })
            }
            SyntaxKind::WikiLink => {
                let resolved = self.find_closest_match(candidate.reference)?;
                let display = candidate.display.unwrap_or(candidate.reference);

                Some(Match::link(candidate.range.clone(), display, resolved))
            }
            SyntaxKind::AbsolutePath => {
                let Some(relative) = self.project_relative(candidate.reference) else {
                    debug!(
                        path = candidate.reference,
                        project_root = ?self.project_root,
                        "absolute path outside project root"
                    );
                    return None;
                };

                Some(Match::link(
                    candidate.range.clone(),
                    candidate.reference,
                    relative.to_string(),
                ))
            }
            SyntaxKind::RelativePath => {
                let resolved = self.lookup_relative(candidate.reference)?;

                Some(Match::link(
                    candidate.range.clone(),
                    candidate.reference,
                    resolved,
                ))
            }
        }
    }

    /// All non-overlapping references in `text`, ordered by position.
    pub fn resolve_references(&self, text: &str) -> Vec<Match> {
        let mut claimed = ClaimedSpans::default();
        let mut matches = vec![];

        for candidate in scan::candidates(text, &self.settings, self.project_root.is_some()) {
            if claimed.overlaps(&candidate.range) {
                trace!(
                    reference = candidate.reference,
                    kind = ?candidate.kind,
                    "candidate overlaps an accepted match"
                );
                continue;
            }

            if let Some(found) = self.resolve_candidate(&candidate) {
                debug!(
                    reference = candidate.reference,
                    resolved = %found.resolved_path,
                    kind = ?candidate.kind,
                    "resolved file reference"
                );
                claimed.insert(candidate.range.clone());
                matches.push(found);
            }
        }

        matches.sort_by_key(|found| found.start);
        matches
    }

    /// Resolves the whole content of an inline code span as one reference.
    ///
    /// The content is taken as a path in its entirety, so spaces, brackets
    /// and parentheses in file names are fine. Only `[[...]]` and
    /// `![[...]]` content goes through the scanners. The returned match
    /// spans the entire `code`. Absolute paths display only their file name.
    pub fn resolve_inline_code(&self, code: &str) -> Option<Match> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return None;
        }

        let found = if trimmed.starts_with("[[") || trimmed.starts_with("![[") {
            scan::candidates(trimmed, &self.settings, false)
                .into_iter()
                .filter(|candidate| candidate.range == (0..trimmed.len()))
                .find_map(|candidate| self.resolve_candidate(&candidate))
        } else if trimmed.starts_with('/') {
            self.resolve_absolute_code(trimmed)
        } else {
            self.resolve_relative_code(trimmed)
        }?;

        debug!(code = trimmed, resolved = %found.resolved_path, "resolved inline code");

        Some(Match {
            start: 0,
            end: code.len(),
            ..found
        })
    }

    fn resolve_absolute_code(&self, path: &str) -> Option<Match> {
        if !self.settings.absolute_paths || !scan::has_text_extension(path) {
            return None;
        }
        let relative = self.project_relative(path)?;

        Some(Match::link(
            0..path.len(),
            basename(path),
            relative.to_string(),
        ))
    }

    fn resolve_relative_code(&self, path: &str) -> Option<Match> {
        if !self.settings.relative_paths
            || !(path.contains('/') || scan::has_text_extension(path))
        {
            return None;
        }
        let resolved = self.lookup_relative(path)?;

        Some(Match::link(0..path.len(), path, resolved))
    }
}
