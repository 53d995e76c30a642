//! Arena Allocator - O(1) slab allocator for resting orders.
//!
//! The arena pre-allocates a contiguous block of order nodes at startup,
//! eliminating heap allocation in the hot path. Free nodes form an
//! intrusive singly-linked list threaded through the same `next` field
//! that live nodes use for their price level's FIFO queue.

use std::fmt;

/// Sentinel value representing a null/invalid index (like nullptr)
pub const NULL_INDEX: u32 = u32::MAX;

/// Type alias for arena indices - our "compressed pointers"
pub type ArenaIndex = u32;

/// A single resting order - 32 bytes, two per cache line.
///
/// # Memory Layout
///
/// | Field      | Type | Offset | Size |
/// |------------|------|--------|------|
/// | price      | u64  | 0      | 8    |
/// | order_id   | u64  | 8      | 8    |
/// | qty        | u32  | 16     | 4    |
/// | next       | u32  | 20     | 4    |
/// | (padding)  | -    | 24     | 8    |
/// | **Total**  |      |        | 32   |
#[repr(C)]
#[repr(align(32))]
#[derive(Clone, Copy)]
pub struct OrderNode {
    /// Tick price the order rests at
    pub price: u64,

    /// External order ID (caller-assigned)
    pub order_id: u64,

    /// Remaining quantity to fill
    pub qty: u32,

    /// Next order at the same price level while live,
    /// next free slot while on the free list.
    pub next: ArenaIndex,
}

const _: () = assert!(
    std::mem::size_of::<OrderNode>() == 32,
    "OrderNode must be exactly 32 bytes (half a cache line)"
);

impl OrderNode {
    /// Create a new unlinked order node
    #[inline]
    pub fn new(order_id: u64, price: u64, qty: u32) -> Self {
        Self {
            price,
            order_id,
            qty,
            next: NULL_INDEX,
        }
    }

    /// Create an empty node (for the free list)
    #[inline]
    pub const fn empty() -> Self {
        Self {
            price: 0,
            order_id: 0,
            qty: 0,
            next: NULL_INDEX,
        }
    }
}

impl fmt::Debug for OrderNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderNode")
            .field("order_id", &self.order_id)
            .field("price", &self.price)
            .field("qty", &self.qty)
            .field("next", &self.next)
            .finish()
    }
}

/// Pre-allocated order pool with O(1) allocation and deallocation.
///
/// Exhaustion is not an error: `alloc` returns `None` and the caller
/// reports the rejected order.
pub struct Arena {
    /// Contiguous block of pre-allocated nodes
    nodes: Vec<OrderNode>,

    /// Head of the free list (index of first available node)
    free_head: ArenaIndex,

    /// Number of currently allocated nodes
    allocated_count: u32,

    /// Total capacity
    capacity: u32,

    /// Per-slot liveness, debug builds only
    #[cfg(debug_assertions)]
    live: Vec<bool>,
}

impl Arena {
    /// Create a new arena with the specified capacity.
    ///
    /// # Panics
    /// Panics if capacity is not below `NULL_INDEX` (reserved as the sentinel).
    pub fn new(capacity: u32) -> Self {
        assert!(capacity < NULL_INDEX, "Capacity must be less than NULL_INDEX");

        let mut nodes = vec![OrderNode::empty(); capacity as usize];

        // Thread the free list: slot i points at slot i + 1
        for i in 1..capacity {
            nodes[(i - 1) as usize].next = i;
        }

        Self {
            nodes,
            free_head: if capacity > 0 { 0 } else { NULL_INDEX },
            allocated_count: 0,
            capacity,
            #[cfg(debug_assertions)]
            live: vec![false; capacity as usize],
        }
    }

    /// Allocate a node from the arena.
    ///
    /// Returns `None` if the arena is full. The returned node is unlinked.
    ///
    /// # Complexity
    /// O(1) - pops from head of free list
    #[inline]
    pub fn alloc(&mut self) -> Option<ArenaIndex> {
        if self.free_head == NULL_INDEX {
            return None;
        }

        let index = self.free_head;
        let node = &mut self.nodes[index as usize];
        self.free_head = node.next;
        node.next = NULL_INDEX;
        self.allocated_count += 1;

        #[cfg(debug_assertions)]
        {
            self.live[index as usize] = true;
        }

        Some(index)
    }

    /// Free a node back to the arena.
    ///
    /// The caller must ensure the index is currently allocated and already
    /// detached from its price level. Freeing twice corrupts the free list;
    /// debug builds panic on it.
    ///
    /// # Complexity
    /// O(1) - pushes to head of free list
    #[inline]
    pub fn free(&mut self, index: ArenaIndex) {
        debug_assert!(index < self.capacity, "Index out of bounds");
        #[cfg(debug_assertions)]
        {
            assert!(self.live[index as usize], "Double free detected");
            self.live[index as usize] = false;
        }

        let node = &mut self.nodes[index as usize];
        *node = OrderNode::empty();
        node.next = self.free_head;
        self.free_head = index;
        self.allocated_count -= 1;
    }

    /// Get an immutable reference to a node.
    #[inline]
    pub fn get(&self, index: ArenaIndex) -> &OrderNode {
        debug_assert!(index < self.capacity, "Index out of bounds");
        &self.nodes[index as usize]
    }

    /// Get a mutable reference to a node.
    #[inline]
    pub fn get_mut(&mut self, index: ArenaIndex) -> &mut OrderNode {
        debug_assert!(index < self.capacity, "Index out of bounds");
        &mut self.nodes[index as usize]
    }

    /// Returns the number of currently allocated nodes.
    #[inline]
    pub fn allocated(&self) -> u32 {
        self.allocated_count
    }

    /// Returns the total capacity of the arena.
    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns true if the arena is empty (no allocated nodes).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.allocated_count == 0
    }

    /// Returns true if the arena is full (no free nodes).
    #[inline]
    pub fn is_full(&self) -> bool {
        self.free_head == NULL_INDEX
    }

    /// Length of the free list, walked node by node. Test and debug aid only.
    pub fn free_list_len(&self) -> usize {
        let mut len = 0;
        let mut cursor = self.free_head;
        while cursor != NULL_INDEX {
            len += 1;
            cursor = self.nodes[cursor as usize].next;
        }
        len
    }

    /// Pre-fault all memory pages (warm-up routine).
    ///
    /// Walks through all nodes to force the OS to map virtual pages
    /// to physical RAM, preventing page faults in the hot path.
    pub fn warm_up(&mut self) {
        for node in &mut self.nodes {
            let qty = node.qty;
            // Volatile write of the existing value so the loop is not elided
            unsafe {
                std::ptr::write_volatile(&mut node.qty, qty);
            }
        }
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity)
            .field("allocated", &self.allocated_count)
            .field("free_head", &self.free_head)
            .finish()
    }
}
