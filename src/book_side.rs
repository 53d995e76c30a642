//! Book Side - one price ladder plus its order arena.
//!
//! Bids and asks share one implementation. Everything that differs
//! between them (which index is "better", whether a resting price
//! crosses an incoming limit, which way to scan after depletion) is
//! answered by the side's [`Side`] policy.
//!
//! The ladder holds one [`PriceLevel`] per tick, allocated once at
//! construction. Only quantities and queue contents change afterwards.

use log::trace;

use crate::arena::{Arena, ArenaIndex, OrderNode, NULL_INDEX};
use crate::command::{PlaceOrder, Side, Trade};
use crate::config::BookConfig;
use crate::price_level::PriceLevel;

/// One side of the book: a dense ladder of levels and the arena that
/// stores their orders.
pub struct BookSide {
    /// Which side this is (decides the direction policy)
    side: Side,
    /// One level per tick, index 0 = lowest price
    levels: Vec<PriceLevel>,
    /// Storage for this side's resting orders
    arena: Arena,
    /// Most aggressive non-empty level, `None` when the side is empty
    best: Option<usize>,
}

impl BookSide {
    /// Build an empty side for a validated configuration.
    pub fn new(side: Side, config: &BookConfig) -> Self {
        let levels = (0..config.num_levels())
            .map(|i| PriceLevel::new(config.index_to_price(i)))
            .collect();

        Self {
            side,
            levels,
            arena: Arena::new(config.capacity),
            best: None,
        }
    }

    /// Which side of the book this is
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    // ========================================================================
    // Best Price Access
    // ========================================================================

    /// Ladder index of the best level, `None` if the side is empty
    #[inline]
    pub fn best_index(&self) -> Option<usize> {
        self.best
    }

    /// Price of the best level, `None` if the side is empty
    #[inline]
    pub fn best_price(&self) -> Option<u64> {
        self.best.map(|i| self.levels[i].price)
    }

    /// Walk from a just-emptied best level toward less aggressive prices
    /// until liquidity is found.
    fn rescan_best(&mut self, depleted: usize) {
        let num_levels = self.levels.len();
        let mut cursor = self.side.step_back(depleted, num_levels);

        while let Some(index) = cursor {
            if self.levels[index].total_qty > 0 {
                trace!(
                    "{:?} best moved {} -> {}",
                    self.side,
                    self.levels[depleted].price,
                    self.levels[index].price
                );
                self.best = Some(index);
                return;
            }
            cursor = self.side.step_back(index, num_levels);
        }

        trace!("{:?} side emptied at {}", self.side, self.levels[depleted].price);
        self.best = None;
    }

    // ========================================================================
    // Order Management
    // ========================================================================

    /// Rest a new order at ladder `index`.
    ///
    /// # Returns
    /// The arena slot of the new order, or `None` if the arena is full.
    /// On `None` the side is left exactly as it was.
    ///
    /// # Complexity
    /// O(1): a new order can only improve or tie the best level
    pub fn add_order(&mut self, index: usize, qty: u32, order_id: u64) -> Option<ArenaIndex> {
        debug_assert!(index < self.levels.len(), "ladder index out of range");
        debug_assert!(qty > 0, "resting orders must carry quantity");

        let arena_idx = self.arena.alloc()?;

        let level = &mut self.levels[index];
        *self.arena.get_mut(arena_idx) = OrderNode::new(order_id, level.price, qty);
        level.push_back(&mut self.arena, arena_idx);

        if self
            .best
            .map_or(true, |best| self.side.is_more_aggressive(index, best))
        {
            self.best = Some(index);
        }

        Some(arena_idx)
    }

    // ========================================================================
    // Matching
    // ========================================================================

    /// Match an incoming opposite-side order against this side's liquidity.
    ///
    /// # Algorithm
    /// 1. Stop when the incoming order is filled or this side is empty
    /// 2. Stop when the best level no longer crosses the incoming limit
    /// 3. Drain the best level head-first, one trade per maker touched;
    ///    filled makers go back to the arena, a drained level triggers a
    ///    rescan for the next best
    ///
    /// Trades are appended to `trades` at the maker's price. The vector is
    /// the only thing that may allocate; reserve it up front to keep the
    /// path allocation-free.
    ///
    /// # Returns
    /// The unmatched remainder of the incoming order
    pub fn match_incoming(&mut self, order: &PlaceOrder, trades: &mut Vec<Trade>) -> u32 {
        debug_assert_eq!(order.side, self.side.opposite(), "order routed to its own side");

        let mut remaining = order.qty;

        while remaining > 0 {
            let Some(best) = self.best else {
                break;
            };

            let level = &mut self.levels[best];
            if !self.side.accepts(level.price, order.price) {
                break;
            }

            while remaining > 0 {
                let maker_idx = level.peek_head();
                if maker_idx == NULL_INDEX {
                    break;
                }

                let maker = self.arena.get_mut(maker_idx);
                let trade_qty = remaining.min(maker.qty);

                trades.push(Trade {
                    taker_order_id: order.order_id,
                    maker_order_id: maker.order_id,
                    price: maker.price,
                    qty: trade_qty,
                    taker_side: order.side,
                });

                maker.qty -= trade_qty;
                let maker_filled = maker.qty == 0;
                remaining -= trade_qty;
                level.subtract_qty(trade_qty);

                if maker_filled {
                    level.pop_front(&mut self.arena);
                    self.arena.free(maker_idx);
                }
            }

            if self.levels[best].is_empty() {
                self.rescan_best(best);
            }
        }

        remaining
    }

    /// Match an incoming buy against this (ask) side.
    #[inline]
    pub fn match_buy(&mut self, price: u64, qty: u32, order_id: u64, trades: &mut Vec<Trade>) -> u32 {
        self.match_incoming(&PlaceOrder::bid(order_id, price, qty), trades)
    }

    /// Match an incoming sell against this (bid) side.
    #[inline]
    pub fn match_sell(&mut self, price: u64, qty: u32, order_id: u64, trades: &mut Vec<Trade>) -> u32 {
        self.match_incoming(&PlaceOrder::ask(order_id, price, qty), trades)
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Non-empty levels from most to least aggressive.
    ///
    /// Scans the whole ladder and never reads the cached best index, so it
    /// can be used to cross-check it.
    pub fn levels(&self) -> impl Iterator<Item = LevelView<'_>> + '_ {
        let num_levels = self.levels.len();
        let side = self.side;

        (0..num_levels)
            .map(move |i| match side {
                Side::Bid => num_levels - 1 - i,
                Side::Ask => i,
            })
            .map(move |i| &self.levels[i])
            .filter(|level| !level.is_empty())
            .map(move |level| LevelView {
                level,
                arena: &self.arena,
            })
    }

    /// (total quantity, order count) at ladder `index`
    #[inline]
    pub fn depth_at(&self, index: usize) -> (u64, u32) {
        let level = &self.levels[index];
        (level.total_qty, level.count)
    }

    /// Number of resting orders on this side
    #[inline]
    pub fn order_count(&self) -> usize {
        self.arena.allocated() as usize
    }

    /// Resting orders this side can still accept
    #[inline]
    pub fn free_slots(&self) -> u32 {
        self.arena.capacity() - self.arena.allocated()
    }

    /// True if no order rests on this side
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.best.is_none()
    }

    /// Pre-fault the arena's pages
    pub fn warm_up(&mut self) {
        self.arena.warm_up();
    }
}

impl std::fmt::Debug for BookSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookSide")
            .field("side", &self.side)
            .field("best", &self.best_price())
            .field("levels", &self.levels.len())
            .field("arena", &self.arena)
            .finish()
    }
}

/// Read-only view of one non-empty price level.
#[derive(Clone, Copy)]
pub struct LevelView<'a> {
    level: &'a PriceLevel,
    arena: &'a Arena,
}

impl<'a> LevelView<'a> {
    /// Tick price of the level
    #[inline]
    pub fn price(&self) -> u64 {
        self.level.price
    }

    /// Aggregate resting quantity
    #[inline]
    pub fn total_qty(&self) -> u64 {
        self.level.total_qty
    }

    /// Number of resting orders
    #[inline]
    pub fn order_count(&self) -> u32 {
        self.level.count
    }

    /// Resting orders in FIFO (match) order
    pub fn orders(&self) -> impl Iterator<Item = RestingOrder> + 'a {
        self.level.iter(self.arena).map(|node| RestingOrder {
            order_id: node.order_id,
            qty: node.qty,
        })
    }
}

impl std::fmt::Debug for LevelView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Level")
            .field("price", &self.price())
            .field("total_qty", &self.total_qty())
            .field("orders", &self.orders().collect::<Vec<_>>())
            .finish()
    }
}

/// A resting order as seen through inspection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RestingOrder {
    pub order_id: u64,
    pub qty: u32,
}
