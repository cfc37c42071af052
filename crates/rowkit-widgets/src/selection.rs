#![forbid(unsafe_code)]

//! Sparse row selection set.
//!
//! Stores selected row indices as ordered, non-overlapping, non-adjacent
//! half-open ranges, so a select-all over a huge list costs one range and
//! membership checks stay O(log ranges).
//!
//! # Invariants
//!
//! 1. Ranges are sorted by start, pairwise disjoint, and separated by at
//!    least one unselected row (adjacent ranges coalesce on insert).
//! 2. Every stored range is non-empty.

use std::ops::Range;

use smallvec::SmallVec;

/// An ordered set of selected row indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ranges: SmallVec<[Range<usize>; 4]>,
}

impl SelectionSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding exactly one row.
    #[must_use]
    pub fn single(row: usize) -> Self {
        let mut set = Self::new();
        set.insert(row);
        set
    }

    /// Number of selected rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.iter().map(|r| r.end - r.start).sum()
    }

    /// True if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// True if `row` is selected. O(log ranges).
    #[must_use]
    pub fn contains(&self, row: usize) -> bool {
        let idx = self.ranges.partition_point(|r| r.end <= row);
        self.ranges.get(idx).is_some_and(|r| r.start <= row)
    }

    /// Lowest selected row, if any.
    #[must_use]
    pub fn first(&self) -> Option<usize> {
        self.ranges.first().map(|r| r.start)
    }

    /// Highest selected row, if any.
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.ranges.last().map(|r| r.end - 1)
    }

    /// Select one row.
    pub fn insert(&mut self, row: usize) {
        self.insert_range(row..row.saturating_add(1));
    }

    /// Select every row in `range`.
    pub fn insert_range(&mut self, range: Range<usize>) {
        if range.start >= range.end {
            return;
        }
        let mut merged = range;
        let mut out: SmallVec<[Range<usize>; 4]> = SmallVec::new();
        let mut placed = false;
        for r in self.ranges.drain(..) {
            if r.end < merged.start {
                out.push(r);
            } else if r.start > merged.end {
                if !placed {
                    out.push(merged.clone());
                    placed = true;
                }
                out.push(r);
            } else {
                // Overlapping or touching: coalesce.
                merged.start = merged.start.min(r.start);
                merged.end = merged.end.max(r.end);
            }
        }
        if !placed {
            out.push(merged);
        }
        self.ranges = out;
    }

    /// Deselect one row.
    pub fn remove(&mut self, row: usize) {
        self.remove_range(row..row.saturating_add(1));
    }

    /// Deselect every row in `range`.
    pub fn remove_range(&mut self, range: Range<usize>) {
        if range.start >= range.end {
            return;
        }
        let mut out: SmallVec<[Range<usize>; 4]> = SmallVec::new();
        for r in self.ranges.drain(..) {
            if r.end <= range.start || r.start >= range.end {
                out.push(r);
                continue;
            }
            if r.start < range.start {
                out.push(r.start..range.start);
            }
            if r.end > range.end {
                out.push(range.end..r.end);
            }
        }
        self.ranges = out;
    }

    /// Drop every selected row at or beyond `len`. Returns true if any row
    /// was pruned. Used when the row count shrinks.
    pub fn truncate(&mut self, len: usize) -> bool {
        let before = self.ranges.len();
        let had_tail = self.ranges.last().is_some_and(|r| r.end > len);
        self.remove_range(len..usize::MAX);
        had_tail || self.ranges.len() != before
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    /// The stored ranges, in order.
    #[must_use]
    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// Iterate over selected rows in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.ranges.iter().flat_map(Clone::clone)
    }
}

impl FromIterator<usize> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = Self::new();
        for row in iter {
            set.insert(row);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_insert_coalesces_adjacent() {
        let mut set = SelectionSet::new();
        set.insert(3);
        set.insert(5);
        set.insert(4);
        assert_eq!(set.ranges(), &[3..6]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_insert_range_merges_overlaps() {
        let mut set = SelectionSet::new();
        set.insert_range(0..3);
        set.insert_range(10..12);
        set.insert_range(2..10);
        assert_eq!(set.ranges(), &[0..12]);
    }

    #[test]
    fn test_remove_splits_range() {
        let mut set = SelectionSet::new();
        set.insert_range(0..10);
        set.remove(4);
        assert_eq!(set.ranges(), &[0..4, 5..10]);
        assert!(!set.contains(4));
        assert!(set.contains(3));
        assert!(set.contains(5));
    }

    #[test]
    fn test_truncate_reports_pruning() {
        let mut set = SelectionSet::new();
        set.insert_range(2..8);
        assert!(set.truncate(5));
        assert_eq!(set.ranges(), &[2..5]);
        assert!(!set.truncate(5));
        assert!(set.truncate(2));
        assert!(set.is_empty());
    }

    #[test]
    fn test_first_last() {
        let mut set = SelectionSet::new();
        assert_eq!(set.first(), None);
        set.insert_range(7..9);
        set.insert(2);
        assert_eq!(set.first(), Some(2));
        assert_eq!(set.last(), Some(8));
    }

    #[test]
    fn test_empty_range_is_noop() {
        let mut set = SelectionSet::new();
        set.insert_range(5..5);
        assert!(set.is_empty());
        set.insert(1);
        set.remove_range(3..3);
        assert_eq!(set.len(), 1);
    }

    /// Mirror-model operations against a BTreeSet oracle.
    #[derive(Debug, Clone)]
    enum Op {
        Insert(usize),
        InsertRange(usize, usize),
        Remove(usize),
        RemoveRange(usize, usize),
        Truncate(usize),
        Clear,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..64).prop_map(Op::Insert),
            (0usize..64, 0usize..16).prop_map(|(a, n)| Op::InsertRange(a, a + n)),
            (0usize..64).prop_map(Op::Remove),
            (0usize..64, 0usize..16).prop_map(|(a, n)| Op::RemoveRange(a, a + n)),
            (0usize..64).prop_map(Op::Truncate),
            Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn matches_btreeset_oracle(ops in proptest::collection::vec(op_strategy(), 0..40)) {
            let mut set = SelectionSet::new();
            let mut oracle = BTreeSet::new();
            for op in ops {
                match op {
                    Op::Insert(r) => {
                        set.insert(r);
                        oracle.insert(r);
                    }
                    Op::InsertRange(a, b) => {
                        set.insert_range(a..b);
                        oracle.extend(a..b);
                    }
                    Op::Remove(r) => {
                        set.remove(r);
                        oracle.remove(&r);
                    }
                    Op::RemoveRange(a, b) => {
                        set.remove_range(a..b);
                        for r in a..b {
                            oracle.remove(&r);
                        }
                    }
                    Op::Truncate(n) => {
                        set.truncate(n);
                        oracle.retain(|&r| r < n);
                    }
                    Op::Clear => {
                        set.clear();
                        oracle.clear();
                    }
                }
                prop_assert_eq!(set.len(), oracle.len());
                prop_assert_eq!(set.iter().collect::<Vec<_>>(), oracle.iter().copied().collect::<Vec<_>>());
                prop_assert_eq!(set.first(), oracle.first().copied());
                for probe in 0..80 {
                    prop_assert_eq!(set.contains(probe), oracle.contains(&probe));
                }
            }
        }
    }
}
