//! Indexed binary min-heap with in-place priority updates.
//!
//! `std::collections::BinaryHeap` cannot change the priority of an item
//! once pushed; the usual workaround (push a duplicate, skip stale
//! entries on pop) lets the heap grow with every rescore. Stream
//! reduction rescores a handful of neighbors on every arrival for the
//! lifetime of the stream, so the heap here keeps a side index from item
//! id to heap slot and repositions items in place instead.

use std::cmp::Ordering;

/// Heap ordering key: lowest score first, ties broken by lowest `order`.
///
/// Scores are compared with [`f64::total_cmp`], so the ordering is total
/// and deterministic even for signed zeros.
#[derive(Debug, Clone, Copy)]
pub struct Priority {
    /// Importance score.
    pub score: f64,
    /// Tie-break rank (arrival sequence or input index).
    pub order: usize,
}

impl Priority {
    /// Create a new priority.
    #[must_use]
    pub const fn new(score: f64, order: usize) -> Self {
        Self { score, order }
    }
}

impl PartialEq for Priority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Priority {}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.order.cmp(&other.order))
    }
}

/// Min-heap of item ids with a side index for O(log n) update and removal.
///
/// Item ids are small dense integers (arena slots); the side index is a
/// vector indexed by id.
#[derive(Debug, Clone, Default)]
pub struct IndexedMinHeap {
    /// Heap-ordered `(id, priority)` entries.
    entries: Vec<(usize, Priority)>,
    /// `positions[id]` is the slot of `id` in `entries`, if present.
    positions: Vec<Option<usize>>,
}

impl IndexedMinHeap {
    /// Create an empty heap sized for ids below `capacity`.
    #[cfg(test)]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            positions: vec![None; capacity],
        }
    }

    /// Number of items in the heap.
    #[cfg(test)]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the heap holds no items.
    #[cfg(test)]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `id` is in the heap.
    #[must_use]
    pub fn contains(&self, id: usize) -> bool {
        self.positions.get(id).is_some_and(Option::is_some)
    }

    /// Current priority of `id`, if present.
    #[cfg(test)]
    #[must_use]
    pub fn priority(&self, id: usize) -> Option<Priority> {
        let slot = (*self.positions.get(id)?)?;
        Some(self.entries[slot].1)
    }

    /// The item with the lowest priority, without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<(usize, Priority)> {
        self.entries.first().copied()
    }

    /// Insert `id`, or reposition it if it is already present.
    pub fn push(&mut self, id: usize, priority: Priority) {
        if self.contains(id) {
            self.update(id, priority);
            return;
        }

        if id >= self.positions.len() {
            self.positions.resize(id + 1, None);
        }
        let slot = self.entries.len();
        self.entries.push((id, priority));
        self.positions[id] = Some(slot);
        self.sift_up(slot);
    }

    /// Remove and return the item with the lowest priority.
    pub fn pop(&mut self) -> Option<(usize, Priority)> {
        let (id, _) = self.peek()?;
        self.remove(id).map(|priority| (id, priority))
    }

    /// Change the priority of `id`. Returns `false` if `id` is absent.
    pub fn update(&mut self, id: usize, priority: Priority) -> bool {
        let Some(slot) = self.positions.get(id).copied().flatten() else {
            return false;
        };

        let previous = self.entries[slot].1;
        self.entries[slot].1 = priority;
        match priority.cmp(&previous) {
            Ordering::Less => self.sift_up(slot),
            Ordering::Greater => self.sift_down(slot),
            Ordering::Equal => {}
        }
        true
    }

    /// Remove `id` from the heap, returning its priority.
    pub fn remove(&mut self, id: usize) -> Option<Priority> {
        let slot = self.positions.get(id).copied().flatten()?;
        let last = self.entries.len() - 1;
        self.swap(slot, last);
        let (_, priority) = self.entries.pop()?;
        self.positions[id] = None;

        if slot < self.entries.len() {
            // The entry moved into `slot` may belong above or below it.
            self.sift_up(slot);
            self.sift_down(slot);
        }
        Some(priority)
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.entries[slot].1 >= self.entries[parent].1 {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < len && self.entries[left].1 < self.entries[smallest].1 {
                smallest = left;
            }
            if right < len && self.entries[right].1 < self.entries[smallest].1 {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.entries.swap(a, b);
        self.positions[self.entries[a].0] = Some(a);
        self.positions[self.entries[b].0] = Some(b);
    }
}
