//! Order, trade and event types for the matching core.
//!
//! `PlaceOrder` is the only input. `Trade` is the core's output;
//! `OutputEvent` is what the [`Engine`](crate::engine::Engine) layer
//! reports back to its driver.

use serde::{Deserialize, Serialize};

/// Order side (bid = buy, ask = sell)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Side {
    /// Buy side (bids)
    #[serde(alias = "buy")]
    Bid = 0,
    /// Sell side (asks)
    #[serde(alias = "sell")]
    Ask = 1,
}

impl Side {
    /// Returns the opposite side
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    /// True if ladder index `a` is strictly more aggressive than `b` on this side.
    ///
    /// Bids prefer higher prices, asks prefer lower ones.
    #[inline]
    pub const fn is_more_aggressive(self, a: usize, b: usize) -> bool {
        match self {
            Side::Bid => a > b,
            Side::Ask => a < b,
        }
    }

    /// True if a resting order on this side at `resting_price` can trade
    /// with an incoming opposite-side order limited at `incoming_price`.
    #[inline]
    pub const fn accepts(self, resting_price: u64, incoming_price: u64) -> bool {
        match self {
            // Seller willing to accept <= highest bid
            Side::Bid => resting_price >= incoming_price,
            // Buyer willing to pay >= lowest ask
            Side::Ask => resting_price <= incoming_price,
        }
    }

    /// The next less aggressive ladder index after `index`, if one exists.
    #[inline]
    pub fn step_back(self, index: usize, num_levels: usize) -> Option<usize> {
        match self {
            Side::Bid => index.checked_sub(1),
            Side::Ask => Some(index + 1).filter(|&i| i < num_levels),
        }
    }
}

// ============================================================================
// Input
// ============================================================================

/// Place a new limit order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrder {
    /// External order ID (client-assigned, unique among live orders)
    pub order_id: u64,
    /// Order side (bid/ask)
    pub side: Side,
    /// Tick price
    pub price: u64,
    /// Order quantity
    pub qty: u32,
}

impl PlaceOrder {
    /// Buy order shorthand
    #[inline]
    pub const fn bid(order_id: u64, price: u64, qty: u32) -> Self {
        Self { order_id, side: Side::Bid, price, qty }
    }

    /// Sell order shorthand
    #[inline]
    pub const fn ask(order_id: u64, price: u64, qty: u32) -> Self {
        Self { order_id, side: Side::Ask, price, qty }
    }
}

// ============================================================================
// Output
// ============================================================================

/// A trade was executed. Immutable once emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trade {
    /// Aggressive (incoming) order ID
    pub taker_order_id: u64,
    /// Passive (resting) order ID
    pub maker_order_id: u64,
    /// Execution price, always the maker's price
    pub price: u64,
    /// Executed quantity
    pub qty: u32,
    /// Side of the taker order
    pub taker_side: Side,
}

/// Order was accepted and resting in the book
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderAccepted {
    pub order_id: u64,
    pub price: u64,
    /// Quantity left resting after any fills
    pub qty: u32,
    pub side: Side,
}

/// Order was rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderRejected {
    pub order_id: u64,
    pub reason: RejectReason,
}

/// Reasons for order rejection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum RejectReason {
    /// Order ID belongs to a live resting order
    DuplicateOrderId = 0,
    /// Side's arena is full; unfilled remainder was dropped
    BookFull = 1,
    /// Price outside the ladder or off the tick grid
    InvalidPrice = 2,
}

/// Output events from the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputEvent {
    /// Trade executed
    Trade(Trade),
    /// Order accepted and resting
    Accepted(OrderAccepted),
    /// Order rejected
    Rejected(OrderRejected),
}
