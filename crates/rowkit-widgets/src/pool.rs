#![forbid(unsafe_code)]

//! Recycled row visual pool.
//!
//! A scrolling list never materializes one visual per row; it keeps a small
//! ring of slots — enough for the viewport plus slack — and rebinds them to
//! new row indices as the window slides. Slots are created lazily on grow,
//! rebound in place, and their visuals dropped only when the pool shrinks
//! or the owning widget is torn down.
//!
//! # Invariants
//!
//! 1. Only one contiguous window `[window_start, window_start + window_len)`
//!    of row indices is ever represented, with `window_len <= capacity`.
//! 2. The slot for a window row is `row % capacity`. Because the window is
//!    no longer than the capacity, this mapping is injective over the
//!    window, and [`RowPool::row_of_slot`] is its exact inverse.

use rowkit_core::geometry::Rect;

/// One recyclable row slot.
#[derive(Debug)]
pub struct Slot<V> {
    row: Option<usize>,
    selected: bool,
    bounds: Rect,
    visual: Option<V>,
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Self {
            row: None,
            selected: false,
            bounds: Rect::default(),
            visual: None,
        }
    }
}

impl<V> Slot<V> {
    /// Row currently bound to this slot, if any.
    #[must_use]
    pub fn row(&self) -> Option<usize> {
        self.row
    }

    /// Whether the bound row was selected at bind time.
    #[must_use]
    pub fn selected(&self) -> bool {
        self.selected
    }

    /// Slot bounds in content coordinates.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The pooled custom visual, if the model supplied one.
    #[must_use]
    pub fn visual(&self) -> Option<&V> {
        self.visual.as_ref()
    }

    /// Take the visual out for recycling.
    pub fn take_visual(&mut self) -> Option<V> {
        self.visual.take()
    }

    /// Store a (possibly recycled) visual.
    pub fn set_visual(&mut self, visual: Option<V>) {
        self.visual = visual;
    }

    /// Point the slot at a row. Returns true if row or selection changed,
    /// i.e. the host needs to repaint this slot.
    pub fn rebind(&mut self, row: usize, selected: bool, bounds: Rect) -> bool {
        let changed = self.row != Some(row) || self.selected != selected;
        self.row = Some(row);
        self.selected = selected;
        self.bounds = bounds;
        changed
    }
}

/// Bounded ring of row slots covering a sliding contiguous window.
#[derive(Debug, Default)]
pub struct RowPool<V> {
    slots: Vec<Slot<V>>,
    window_start: usize,
    window_len: usize,
}

impl<V> RowPool<V> {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            window_start: 0,
            window_len: 0,
        }
    }

    /// Number of pooled slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The window of row indices currently backed by slots.
    #[must_use]
    pub fn window(&self) -> std::ops::Range<usize> {
        self.window_start..self.window_start + self.window_len
    }

    /// Grow or shrink to exactly `capacity` slots. Shrinking drops the
    /// trailing slots (and their visuals); growing appends empty slots.
    pub fn resize(&mut self, capacity: usize) {
        if capacity < self.slots.len() {
            self.slots.truncate(capacity);
        } else {
            while self.slots.len() < capacity {
                self.slots.push(Slot::default());
            }
        }
        self.window_len = self.window_len.min(capacity);
    }

    /// Establish the contiguous window the next rebind pass covers.
    ///
    /// `len` must not exceed the capacity; it is clamped in release builds.
    pub fn begin_window(&mut self, start: usize, len: usize) {
        debug_assert!(len <= self.slots.len(), "window larger than pool");
        self.window_start = start;
        self.window_len = len.min(self.slots.len());
    }

    /// Slot index for a row inside the window.
    #[must_use]
    pub fn slot_index_of(&self, row: usize) -> Option<usize> {
        if self.slots.is_empty() || !self.window().contains(&row) {
            return None;
        }
        Some(row % self.slots.len())
    }

    /// Inverse of [`RowPool::slot_index_of`]: the unique window row mapped
    /// to `slot`, or `None` when the slot is outside the window image.
    #[must_use]
    pub fn row_of_slot(&self, slot: usize) -> Option<usize> {
        let cap = self.slots.len();
        if cap == 0 || slot >= cap {
            return None;
        }
        let offset = (slot + cap - self.window_start % cap) % cap;
        if offset < self.window_len {
            Some(self.window_start + offset)
        } else {
            None
        }
    }

    /// Borrow the slot bound to `row`, if `row` is inside the window.
    #[must_use]
    pub fn slot_for_row(&self, row: usize) -> Option<&Slot<V>> {
        self.slot_index_of(row).map(|i| &self.slots[i])
    }

    /// Mutably borrow the slot bound to `row`.
    pub fn slot_for_row_mut(&mut self, row: usize) -> Option<&mut Slot<V>> {
        self.slot_index_of(row).map(|i| &mut self.slots[i])
    }

    /// Iterate window slots in ascending row order.
    pub fn iter_window(&self) -> impl Iterator<Item = &Slot<V>> {
        self.window().filter_map(|row| self.slot_for_row(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bind_window(pool: &mut RowPool<String>, start: usize, len: usize) {
        pool.begin_window(start, len);
        for row in start..start + len {
            let cap = pool.capacity();
            let slot = &mut pool.slots[row % cap];
            slot.rebind(row, false, Rect::default());
        }
    }

    #[test]
    fn test_mapping_round_trips() {
        let mut pool: RowPool<String> = RowPool::new();
        pool.resize(5);
        bind_window(&mut pool, 13, 5);
        for row in 13..18 {
            let slot = pool.slot_index_of(row).unwrap();
            assert_eq!(pool.row_of_slot(slot), Some(row));
        }
        assert_eq!(pool.slot_index_of(12), None);
        assert_eq!(pool.slot_index_of(18), None);
    }

    #[test]
    fn test_partial_window_leaves_unmapped_slots() {
        let mut pool: RowPool<String> = RowPool::new();
        pool.resize(6);
        bind_window(&mut pool, 4, 3);
        let mapped: Vec<_> = (0..6).filter_map(|s| pool.row_of_slot(s)).collect();
        assert_eq!(mapped.len(), 3);
        for row in 4..7 {
            assert!(mapped.contains(&row));
        }
    }

    #[test]
    fn test_shrink_drops_tail_visuals() {
        let mut pool: RowPool<String> = RowPool::new();
        pool.resize(4);
        for i in 0..4 {
            pool.slots[i].set_visual(Some(format!("v{i}")));
        }
        pool.resize(2);
        assert_eq!(pool.capacity(), 2);
        assert_eq!(pool.slots[0].visual().map(String::as_str), Some("v0"));
    }

    #[test]
    fn test_rebind_reports_changes() {
        let mut slot: Slot<()> = Slot::default();
        assert!(slot.rebind(3, false, Rect::default()));
        assert!(!slot.rebind(3, false, Rect::new(0, 10, 5, 5)));
        assert!(slot.rebind(3, true, Rect::default()));
        assert!(slot.rebind(4, true, Rect::default()));
    }

    #[test]
    fn test_empty_pool_maps_nothing() {
        let pool: RowPool<()> = RowPool::new();
        assert_eq!(pool.slot_index_of(0), None);
        assert_eq!(pool.row_of_slot(0), None);
    }

    proptest! {
        /// slot_of / row_of_slot is a bijection over any contiguous window.
        #[test]
        fn mapping_is_bijective(
            cap in 1usize..16,
            start in 0usize..1000,
            len_ratio in 0usize..=16,
        ) {
            let len = len_ratio.min(cap);
            let mut pool: RowPool<u32> = RowPool::new();
            pool.resize(cap);
            pool.begin_window(start, len);
            let mut seen = std::collections::HashSet::new();
            for row in start..start + len {
                let slot = pool.slot_index_of(row).expect("window row maps");
                prop_assert!(seen.insert(slot), "slot reused inside window");
                prop_assert_eq!(pool.row_of_slot(slot), Some(row));
            }
            for slot in 0..cap {
                if let Some(row) = pool.row_of_slot(slot) {
                    prop_assert_eq!(pool.slot_index_of(row), Some(slot));
                }
            }
        }
    }
}
