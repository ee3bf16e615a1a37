//! Directory-distance ranking for ambiguous filename matches.

use itertools::Itertools;

/// Number of directory hops from `cwd` to `file_path`: up to the deepest
/// shared ancestor, then down to the file. Lower is closer.
///
/// Segments are compared positionally, so `a/b` and `b/a` share nothing.
/// A file directly inside `cwd` scores 1.
pub fn score(file_path: &str, cwd: &str) -> usize {
    let file_parts = file_path.split('/').collect_vec();
    let cwd_parts = cwd.split('/').filter(|s| !s.is_empty()).collect_vec();

    let common = file_parts
        .iter()
        .zip(&cwd_parts)
        .take_while(|(file, dir)| file == dir)
        .count();

    (cwd_parts.len() - common) + (file_parts.len() - common)
}

/// The candidate closest to `cwd`; on equal scores the earliest wins.
pub fn closest<'a, I>(candidates: I, cwd: &str) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a String>,
{
    candidates
        .into_iter()
        .min_by_key(|candidate| score(candidate, cwd))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_in_cwd_scores_one() {
        assert_eq!(score("docs/guide.md", "docs"), 1);
        assert_eq!(score("README.md", ""), 1);
    }

    #[test]
    fn hops_up_and_down_are_summed() {
        assert_eq!(score("src/notes.md", "docs"), 3);
        assert_eq!(score("a/b/c/file.md", "a/x"), 1 + 3);
        assert_eq!(score("README.md", "a/b/c"), 4);
    }

    #[test]
    fn empty_cwd_segments_are_ignored() {
        assert_eq!(score("docs/guide.md", "/docs/"), 1);
        assert_eq!(score("docs/guide.md", "docs//"), 1);
    }

    #[test]
    fn common_prefix_is_positional() {
        assert_eq!(score("b/a/file.md", "a/b"), 2 + 3);
    }

    #[test]
    fn closest_prefers_nearest_directory() {
        let candidates = vec!["A/x.md".to_string(), "B/x.md".to_string()];

        assert_eq!(closest(&candidates, "A"), Some("A/x.md"));
        assert_eq!(closest(&candidates, "B"), Some("B/x.md"));
    }

    #[test]
    fn ties_keep_index_order() {
        let candidates = vec!["B/x.md".to_string(), "A/x.md".to_string()];

        assert_eq!(closest(&candidates, ""), Some("B/x.md"));
        assert_eq!(closest(&candidates, "C"), Some("B/x.md"));
    }

    #[test]
    fn no_candidates() {
        let candidates: Vec<String> = vec![];
        assert_eq!(closest(&candidates, "A"), None);
    }
}
