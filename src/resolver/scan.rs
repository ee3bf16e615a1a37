//! Per-syntax scanners.
//!
//! Each scanner is a pure function from text to candidate spans of one
//! syntax. Candidates are unvalidated: whether they point at a known file
//! is decided by the resolver. Within one scanner candidates never overlap;
//! across scanners they are merged by [`SyntaxKind`] priority.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Settings;

/// Extensions accepted for absolute and relative path mentions.
pub const TEXT_EXTENSIONS: &[&str] = &[
    "md", "txt", "json", "yaml", "yml", "toml", "ts", "tsx", "js", "jsx", "py", "rb", "go", "rs",
    "java", "c", "cpp", "h", "hpp", "css", "scss", "html", "xml", "sh", "bash", "zsh",
];

/// Extensions accepted for `![[...]]` embeds.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg", "bmp", "ico"];

/// Syntax of a candidate. Declaration order is merge priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SyntaxKind {
    ImageEmbed,
    WikiLink,
    AbsolutePath,
    RelativePath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate<'t> {
    pub kind: SyntaxKind,
    /// Byte range of the whole syntax in the scanned text
    pub range: Range<usize>,
    pub reference: &'t str,
    pub display: Option<&'t str>,
    pub width: Option<u32>,
}

fn has_extension(path: &str, extensions: &[&str]) -> bool {
    let filename = path.rsplit('/').next().unwrap_or(path);
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            extensions.iter().any(|known| known.eq_ignore_ascii_case(ext))
        }
        _ => false,
    }
}

pub(crate) fn has_text_extension(path: &str) -> bool {
    has_extension(path, TEXT_EXTENSIONS)
}

/// `![[image.png]]` and `![[image.png|300]]`
pub(crate) fn image_embeds(text: &str) -> Vec<Candidate<'_>> {
    static IMAGE_EMBED_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"!\[\[(?<path>[^\[\]\|]+?)(?:\|(?<width>\d+))?\]\]").unwrap()
    });

    IMAGE_EMBED_RE
        .captures_iter(text)
        .flat_map(|c| match (c.get(0), c.name("path")) {
            (Some(full), Some(path)) => Some((full, path, c.name("width"))),
            _ => None,
        })
        .filter(|(_, path, _)| has_extension(path.as_str().trim(), IMAGE_EXTENSIONS))
        .map(|(full, path, width)| Candidate {
            kind: SyntaxKind::ImageEmbed,
            range: full.range(),
            reference: path.as_str().trim(),
            display: None,
            width: width.and_then(|w| w.as_str().parse().ok()),
        })
        .collect()
}

/// `[[reference]]` and `[[reference|display text]]`
pub(crate) fn wiki_links(text: &str) -> Vec<Candidate<'_>> {
    static WIKI_LINK_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"\[\[(?<reference>[^\[\]\|]+)(?:\|(?<display>[^\[\]]+))?\]\]").unwrap()
    });

    WIKI_LINK_RE
        .captures_iter(text)
        .flat_map(|c| match (c.get(0), c.name("reference")) {
            (Some(full), Some(reference)) => Some((full, reference, c.name("display"))),
            _ => None,
        })
        .filter(|(_, reference, _)| !reference.as_str().trim().is_empty())
        .map(|(full, reference, display)| Candidate {
            kind: SyntaxKind::WikiLink,
            range: full.range(),
            reference: reference.as_str().trim(),
            display: display
                .map(|d| d.as_str().trim())
                .filter(|d| !d.is_empty()),
            width: None,
        })
        .collect()
}

fn trim_trailing_punctuation(path: &str) -> &str {
    path.trim_end_matches(|c: char| matches!(c, '.' | ',' | ':' | ';' | '!' | '?'))
}

/// `/abs/path/to/file.md`, preceded by the start of text, whitespace or an
/// opening bracket/quote.
pub(crate) fn absolute_paths(text: &str) -> Vec<Candidate<'_>> {
    static ABSOLUTE_PATH_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#"(?:^|[\s(\[<{"'`])(?<path>/[^\s/()\[\]<>{}"'`]+(?:/[^\s/()\[\]<>{}"'`]+)+)"#)
            .unwrap()
    });

    ABSOLUTE_PATH_RE
        .captures_iter(text)
        .flat_map(|c| c.name("path"))
        .map(|path| {
            let trimmed = trim_trailing_punctuation(path.as_str());
            (path.start()..path.start() + trimmed.len(), trimmed)
        })
        .filter(|(_, path)| has_text_extension(path))
        .map(|(range, path)| Candidate {
            kind: SyntaxKind::AbsolutePath,
            range,
            reference: path,
            display: None,
            width: None,
        })
        .collect()
}

/// Bare tokens like `src/main.rs` or `notes.md`.
///
/// A token must contain a `/` or end in a known text extension. Tokens
/// glued to a protocol marker (`:`, `@`), a query parameter (`?`, `=`,
/// `&`) or starting at the root (`/`) are not relative paths. Trailing sentence punctuation is not part of the
/// token.
pub(crate) fn relative_paths(text: &str) -> Vec<Candidate<'_>> {
    static PATH_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w\-./]+").unwrap());

    PATH_TOKEN_RE
        .find_iter(text)
        .filter(|token| {
            !matches!(
                text[..token.start()].chars().next_back(),
                Some(':' | '@' | '\\' | '#' | '~' | '=' | '?' | '&')
            )
        })
        .map(|token| {
            let trimmed = token.as_str().trim_end_matches('.');
            (token.start()..token.start() + trimmed.len(), trimmed)
        })
        .filter(|(_, path)| !path.starts_with('/'))
        .filter(|(_, path)| path.chars().any(|c| c.is_alphanumeric()))
        .filter(|(_, path)| path.contains('/') || has_text_extension(path))
        .map(|(range, path)| Candidate {
            kind: SyntaxKind::RelativePath,
            range,
            reference: path,
            display: None,
            width: None,
        })
        .collect()
}

/// All enabled candidates of `text`, highest priority syntax first and
/// left to right within one syntax.
pub(crate) fn candidates<'t>(
    text: &'t str,
    settings: &Settings,
    with_absolute: bool,
) -> Vec<Candidate<'t>> {
    let mut all = vec![];

    if settings.image_embeds {
        all.extend(image_embeds(text));
    }
    if settings.wiki_links {
        all.extend(wiki_links(text));
    }
    if settings.absolute_paths && with_absolute {
        all.extend(absolute_paths(text));
    }
    if settings.relative_paths {
        all.extend(relative_paths(text));
    }

    all.sort_by_key(|candidate| (candidate.kind, candidate.range.start));
    all
}
