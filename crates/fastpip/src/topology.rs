//! Neighbor topology of retained points.
//!
//! Retained points form a doubly linked list stored in an arena: each
//! node records the slots of its previous and next retained neighbor, so
//! "who are my neighbors" and "unlink me" are O(1) without any pointer
//! aliasing. Freed slots are reused, so a stream window of `N` points
//! never holds more than `N + 1` slots.

/// A node in the arena.
#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Arena-backed doubly linked list addressed by slot.
#[derive(Debug, Clone)]
pub struct Topology<T> {
    nodes: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Default for Topology<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<T> Topology<T> {
    /// Create an empty topology with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Number of live nodes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no node is live.
    #[cfg(test)]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots ever allocated (live or free).
    #[cfg(test)]
    #[must_use]
    pub fn slots(&self) -> usize {
        self.nodes.len()
    }

    /// Slot of the first node.
    #[cfg(test)]
    #[must_use]
    pub const fn head(&self) -> Option<usize> {
        self.head
    }

    /// Slot of the last node.
    #[must_use]
    pub const fn tail(&self) -> Option<usize> {
        self.tail
    }

    /// Value stored at `slot`, if live.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&T> {
        self.node(slot).map(|node| &node.value)
    }

    /// Mutable value stored at `slot`, if live.
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut T> {
        self.nodes
            .get_mut(slot)
            .and_then(Option::as_mut)
            .map(|node| &mut node.value)
    }

    /// Slot of the node before `slot`.
    #[must_use]
    pub fn prev(&self, slot: usize) -> Option<usize> {
        self.node(slot).and_then(|node| node.prev)
    }

    /// Slot of the node after `slot`.
    #[must_use]
    pub fn next(&self, slot: usize) -> Option<usize> {
        self.node(slot).and_then(|node| node.next)
    }

    /// Append `value` after the current tail, returning its slot.
    pub fn push_back(&mut self, value: T) -> usize {
        let slot = self.allocate(Node {
            value,
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(tail) => self.set_next(tail, Some(slot)),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        slot
    }

    /// Insert `value` directly after the live node at `slot`.
    ///
    /// Returns the new slot, or `None` if `slot` is not live.
    pub fn insert_after(&mut self, slot: usize, value: T) -> Option<usize> {
        let next = self.node(slot)?.next;
        let new_slot = self.allocate(Node {
            value,
            prev: Some(slot),
            next,
        });
        self.set_next(slot, Some(new_slot));
        match next {
            Some(next) => self.set_prev(next, Some(new_slot)),
            None => self.tail = Some(new_slot),
        }
        Some(new_slot)
    }

    /// Unlink the node at `slot` and return its value.
    pub fn remove(&mut self, slot: usize) -> Option<T> {
        let node = self.nodes.get_mut(slot)?.take()?;
        match node.prev {
            Some(prev) => self.set_next(prev, node.next),
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.set_prev(next, node.prev),
            None => self.tail = node.prev,
        }
        self.free.push(slot);
        self.len -= 1;
        Some(node.value)
    }

    /// Iterate `(slot, value)` pairs from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let slot = cursor?;
            let node = self.node(slot)?;
            cursor = node.next;
            Some((slot, &node.value))
        })
    }

    fn node(&self, slot: usize) -> Option<&Node<T>> {
        self.nodes.get(slot).and_then(Option::as_ref)
    }

    fn allocate(&mut self, node: Node<T>) -> usize {
        self.len += 1;
        if let Some(slot) = self.free.pop() {
            self.nodes[slot] = Some(node);
            slot
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }

    fn set_prev(&mut self, slot: usize, prev: Option<usize>) {
        if let Some(Some(node)) = self.nodes.get_mut(slot) {
            node.prev = prev;
        }
    }

    fn set_next(&mut self, slot: usize, next: Option<usize>) {
        if let Some(Some(node)) = self.nodes.get_mut(slot) {
            node.next = next;
        }
    }
}
