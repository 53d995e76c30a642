//! Order Book - The central limit order book.
//!
//! Owns one bid [`BookSide`] and one ask [`BookSide`] and nothing else.
//! `submit_order` is the only mutating entry point: cross against the
//! opposite side first, then rest whatever is left on the order's own side.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use log::debug;

use crate::book_side::BookSide;
use crate::command::{PlaceOrder, Side, Trade};
use crate::config::BookConfig;
use crate::error::BookError;

/// What happened to a submitted order, beyond the trades it produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Zero quantity; nothing was done
    Ignored,
    /// Fully matched, nothing left to rest
    Filled,
    /// Remainder is resting on the order's own side
    Resting {
        /// Quantity posted to the book
        qty: u32,
    },
    /// Own side's arena was full; remainder was dropped.
    /// Trades produced before the drop still stand.
    Rejected {
        /// Unfilled quantity that could not be rested
        dropped_qty: u32,
    },
}

/// Trades plus outcome of one [`OrderBook::submit`] call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    /// Trades in match order
    pub trades: Vec<Trade>,
    /// Fate of the unmatched remainder
    pub outcome: SubmitOutcome,
}

/// Dense, fixed-range order book for a single instrument.
///
/// Not thread-safe by construction: it needs `&mut self` to submit, so
/// concurrent callers must serialize through one owner.
pub struct OrderBook {
    config: BookConfig,
    /// Buy orders
    bids: BookSide,
    /// Sell orders
    asks: BookSide,
}

impl OrderBook {
    /// Create an empty book. Both ladders and both arenas are allocated here
    /// and never grow.
    pub fn new(config: BookConfig) -> Result<Self, BookError> {
        config.validate()?;

        Ok(Self {
            bids: BookSide::new(Side::Bid, &config),
            asks: BookSide::new(Side::Ask, &config),
            config,
        })
    }

    // ========================================================================
    // Submission
    // ========================================================================

    /// Submit a limit order.
    ///
    /// `trades` is cleared and then filled with this submission's trades in
    /// match order. Reusing one pre-reserved vector across calls keeps the
    /// path free of heap activity.
    ///
    /// The caller must not reuse the id of an order that is still resting.
    ///
    /// # Errors
    /// [`BookError::PriceOutOfRange`] or [`BookError::OffTick`] if the price
    /// is not on the ladder. The book is not touched in that case.
    pub fn submit_order(
        &mut self,
        order: PlaceOrder,
        trades: &mut Vec<Trade>,
    ) -> Result<SubmitOutcome, BookError> {
        trades.clear();

        if order.qty == 0 {
            return Ok(SubmitOutcome::Ignored);
        }

        let index = self.config.price_to_index(order.price)?;

        let (own, opposite) = match order.side {
            Side::Bid => (&mut self.bids, &mut self.asks),
            Side::Ask => (&mut self.asks, &mut self.bids),
        };

        // Phase 1: CROSSING (aggressive matching)
        let remaining = opposite.match_incoming(&order, trades);
        if remaining == 0 {
            return Ok(SubmitOutcome::Filled);
        }

        // Phase 2: RESTING (passive posting)
        match own.add_order(index, remaining, order.order_id) {
            Some(_) => Ok(SubmitOutcome::Resting { qty: remaining }),
            None => {
                debug!(
                    "{:?} arena full, dropping order {} remainder {} @ {}",
                    order.side, order.order_id, remaining, order.price
                );
                Ok(SubmitOutcome::Rejected {
                    dropped_qty: remaining,
                })
            }
        }
    }

    /// Submit a limit order, collecting trades into a fresh vector.
    pub fn submit(&mut self, order: PlaceOrder) -> Result<Submission, BookError> {
        let mut trades = Vec::new();
        let outcome = self.submit_order(order, &mut trades)?;
        Ok(Submission { trades, outcome })
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// The configuration this book was built with
    #[inline]
    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    /// Bid side (read-only)
    #[inline]
    pub fn bids(&self) -> &BookSide {
        &self.bids
    }

    /// Ask side (read-only)
    #[inline]
    pub fn asks(&self) -> &BookSide {
        &self.asks
    }

    /// Read-only access to one side
    #[inline]
    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// Get the best bid price (highest buy price)
    #[inline]
    pub fn best_bid(&self) -> Option<u64> {
        self.bids.best_price()
    }

    /// Get the best ask price (lowest sell price)
    #[inline]
    pub fn best_ask(&self) -> Option<u64> {
        self.asks.best_price()
    }

    /// Calculate spread (best_ask - best_bid)
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if ask > bid => Some(ask - bid),
            _ => None,
        }
    }

    /// (total quantity, order count) at a price. Prices off the ladder
    /// report an empty level.
    pub fn depth_at(&self, side: Side, price: u64) -> (u64, u32) {
        match self.config.price_to_index(price) {
            Ok(index) => self.side(side).depth_at(index),
            Err(_) => (0, 0),
        }
    }

    /// Get the total number of resting orders in the book
    pub fn order_count(&self) -> usize {
        self.bids.order_count() + self.asks.order_count()
    }

    /// Check if the book is empty
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Pre-fault both arenas' memory pages
    pub fn warm_up(&mut self) {
        self.bids.warm_up();
        self.asks.warm_up();
    }

    /// Hash of every resting order in priority order (for determinism testing)
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.best_bid().hash(&mut hasher);
        self.best_ask().hash(&mut hasher);

        for side in [&self.bids, &self.asks] {
            side.side().hash(&mut hasher);
            for level in side.levels() {
                level.price().hash(&mut hasher);
                level.total_qty().hash(&mut hasher);
                for order in level.orders() {
                    order.order_id.hash(&mut hasher);
                    order.qty.hash(&mut hasher);
                }
            }
        }

        hasher.finish()
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self {
            bids: BookSide::new(Side::Bid, &BookConfig::default()),
            asks: BookSide::new(Side::Ask, &BookConfig::default()),
            config: BookConfig::default(),
        }
    }
}

impl std::fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderBook")
            .field("best_bid", &self.best_bid())
            .field("best_ask", &self.best_ask())
            .field("bid_orders", &self.bids.order_count())
            .field("ask_orders", &self.asks.order_count())
            .finish()
    }
}

/// Human-readable dump: each side from best to worst level, orders in
/// FIFO order.
impl std::fmt::Display for OrderBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (name, side) in [("BIDS", &self.bids), ("ASKS", &self.asks)] {
            writeln!(f, "=== {} ===", name)?;
            for level in side.levels() {
                write!(f, "Price {} ({}) ->", level.price(), level.total_qty())?;
                for order in level.orders() {
                    write!(f, " [id={}, qty={}]", order.order_id, order.qty)?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
