#![forbid(unsafe_code)]

//! Row height index.
//!
//! Maps row indices to vertical pixel offsets and back. One entry per row,
//! rebuilt in O(n) whenever the row count or any height may have changed;
//! both directions of lookup are O(log n) over the Fenwick prefix sums.
//!
//! # Invariants
//!
//! 1. `offset_of(i + 1) == offset_of(i) + height(i)` (monotone).
//! 2. `offset_of(0) == 0`.
//! 3. Provider heights of `None` or 0 are replaced by the default height;
//!    the index never stores a zero-height row.
//!
//! Rows past the end extrapolate with the default height so layout code can
//! position trailing pool slots without special cases; *hit testing* past
//! the content bottom misses instead.

use crate::fenwick::FenwickTree;

/// Prefix-sum index over per-row pixel heights.
#[derive(Debug, Clone)]
pub struct HeightIndex {
    tree: FenwickTree,
    default_height: u32,
}

impl HeightIndex {
    /// Create an empty index.
    ///
    /// A non-positive `default_height` is clamped to 1.
    #[must_use]
    pub fn new(default_height: u32) -> Self {
        Self {
            tree: FenwickTree::new(0),
            default_height: default_height.max(1),
        }
    }

    /// Number of rows indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// True if no rows are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The fallback height used for unmeasured and degenerate rows.
    #[must_use]
    pub fn default_height(&self) -> u32 {
        self.default_height
    }

    /// Change the fallback height. Takes effect on the next rebuild.
    pub fn set_default_height(&mut self, height: u32) {
        self.default_height = height.max(1);
    }

    /// Recompute the whole table in O(n).
    ///
    /// `height_of` returning `None` (or zero) means "use the default".
    pub fn rebuild(&mut self, row_count: usize, mut height_of: impl FnMut(usize) -> Option<u32>) {
        let default = self.default_height;
        let heights: Vec<u32> = (0..row_count)
            .map(|row| match height_of(row) {
                Some(h) if h > 0 => h,
                _ => default,
            })
            .collect();
        self.tree = FenwickTree::from_values(&heights);
    }

    /// Update one row's height in place. O(log n).
    pub fn set_height(&mut self, row: usize, height: Option<u32>) {
        let resolved = match height {
            Some(h) if h > 0 => h,
            _ => self.default_height,
        };
        self.tree.set(row, resolved);
    }

    /// Height of `row`; rows past the end report the default.
    #[must_use]
    pub fn height(&self, row: usize) -> u32 {
        if row < self.tree.len() {
            self.tree.get(row)
        } else {
            self.default_height
        }
    }

    /// Top offset of `row` in content coordinates. O(log n).
    ///
    /// Rows past the end extrapolate with the default height.
    #[must_use]
    pub fn offset_of(&self, row: usize) -> u64 {
        let len = self.tree.len();
        if row == 0 {
            return 0;
        }
        if row <= len {
            self.tree.prefix(row - 1)
        } else {
            self.tree.total() + u64::from(self.default_height) * (row - len) as u64
        }
    }

    /// Bottom offset of `row` (top of the next row).
    #[must_use]
    pub fn bottom_of(&self, row: usize) -> u64 {
        self.offset_of(row) + u64::from(self.height(row))
    }

    /// Total content height. O(log n).
    #[must_use]
    pub fn total_height(&self) -> u64 {
        self.tree.total()
    }

    /// The row whose extent contains offset `y`, or `None` when the list is
    /// empty or `y` lies at/past the content bottom. O(log n).
    #[must_use]
    pub fn hit_test(&self, y: u64) -> Option<usize> {
        if self.tree.is_empty() || y >= self.tree.total() {
            return None;
        }
        match self.tree.find_prefix(y) {
            // prefix(i) <= y: offset y is at or past row i's bottom.
            Some(i) => Some(i + 1),
            None => Some(0),
        }
    }

    /// Like [`HeightIndex::hit_test`], but offsets at/past the bottom
    /// resolve to the last row. `None` only for an empty list. Used for
    /// scroll limiting rather than hit testing.
    #[must_use]
    pub fn row_at_clamped(&self, y: u64) -> Option<usize> {
        if self.tree.is_empty() {
            return None;
        }
        Some(self.hit_test(y).unwrap_or(self.tree.len() - 1))
    }
}

impl Default for HeightIndex {
    fn default() -> Self {
        Self::new(22)
    }
}
