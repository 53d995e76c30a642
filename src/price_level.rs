//! Price Level - A FIFO queue of orders at a single price tick.
//!
//! Implements a singly-linked list using arena indices for O(1)
//! append at the tail and removal from the head. Matching only ever
//! consumes from the head, so no back-links are kept.

use crate::arena::{Arena, ArenaIndex, NULL_INDEX};

/// A queue of orders at a specific price level.
///
/// Orders are processed in FIFO order (price-time priority).
/// `total_qty` is maintained incrementally and is zero exactly when the
/// queue is empty.
#[derive(Clone, Copy, Debug)]
pub struct PriceLevel {
    /// Tick price of this level
    pub price: u64,
    /// Index of the oldest order (highest priority, first to match)
    pub head: ArenaIndex,
    /// Index of the newest order (last to match)
    pub tail: ArenaIndex,
    /// Total quantity across all orders at this level
    pub total_qty: u64,
    /// Number of orders at this level
    pub count: u32,
}

impl PriceLevel {
    /// Create a new empty price level at `price`
    #[inline]
    pub const fn new(price: u64) -> Self {
        Self {
            price,
            head: NULL_INDEX,
            tail: NULL_INDEX,
            total_qty: 0,
            count: 0,
        }
    }

    /// Returns true if there are no orders at this level
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Append an order to the tail of the queue (newest order).
    ///
    /// # Complexity
    /// O(1)
    #[inline]
    pub fn push_back(&mut self, arena: &mut Arena, index: ArenaIndex) {
        let qty = arena.get(index).qty;
        debug_assert!(qty > 0, "resting orders must carry quantity");
        arena.get_mut(index).next = NULL_INDEX;

        if self.tail == NULL_INDEX {
            debug_assert!(self.head == NULL_INDEX);
            self.head = index;
        } else {
            arena.get_mut(self.tail).next = index;
        }
        self.tail = index;

        self.count += 1;
        self.total_qty += qty as u64;
    }

    /// Remove and return the head order (oldest/highest priority).
    ///
    /// Subtracts the head's current quantity from the level total.
    /// The order is NOT freed from the arena; caller must do that.
    ///
    /// # Complexity
    /// O(1)
    #[inline]
    pub fn pop_front(&mut self, arena: &mut Arena) -> Option<ArenaIndex> {
        if self.head == NULL_INDEX {
            return None;
        }

        let index = self.head;
        let node = arena.get(index);
        let next_idx = node.next;
        let qty = node.qty;

        self.head = next_idx;
        if next_idx == NULL_INDEX {
            self.tail = NULL_INDEX;
        }

        self.count -= 1;
        self.total_qty -= qty as u64;

        arena.get_mut(index).next = NULL_INDEX;

        Some(index)
    }

    /// Peek at the head order without removing it.
    ///
    /// # Returns
    /// Index of the head order, or `NULL_INDEX` if empty.
    #[inline]
    pub const fn peek_head(&self) -> ArenaIndex {
        self.head
    }

    /// Update total quantity after a fill.
    ///
    /// Call this after modifying an order's qty directly.
    #[inline]
    pub fn subtract_qty(&mut self, qty: u32) {
        debug_assert!(self.total_qty >= qty as u64);
        self.total_qty -= qty as u64;
    }

    /// Iterate over the queue in FIFO order.
    pub fn iter<'a>(&self, arena: &'a Arena) -> LevelIter<'a> {
        LevelIter {
            arena,
            cursor: self.head,
        }
    }
}

/// FIFO iterator over the order nodes of one level.
pub struct LevelIter<'a> {
    arena: &'a Arena,
    cursor: ArenaIndex,
}

impl<'a> Iterator for LevelIter<'a> {
    type Item = &'a crate::arena::OrderNode;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == NULL_INDEX {
            return None;
        }
        let node = self.arena.get(self.cursor);
        self.cursor = node.next;
        Some(node)
    }
}
