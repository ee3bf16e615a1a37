use std::ops::Range;

/// Sorted, non-overlapping set of byte ranges already claimed by accepted
/// matches.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ClaimedSpans(Vec<Range<usize>>);

impl ClaimedSpans {
    /// Whether `range` shares at least one byte with a claimed span.
    pub fn overlaps(&self, range: &Range<usize>) -> bool {
        // first claimed span ending after range.start
        let idx = self.0.partition_point(|span| span.end <= range.start);
        self.0
            .get(idx)
            .is_some_and(|span| span.start < range.end)
    }

    /// Claims `range`. Returns false (and claims nothing) on overlap.
    pub fn insert(&mut self, range: Range<usize>) -> bool {
        if range.is_empty() || self.overlaps(&range) {
            return false;
        }
        let idx = self.0.partition_point(|span| span.start < range.start);
        self.0.insert(idx, range);
        true
    }
}
