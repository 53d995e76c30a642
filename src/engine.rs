//! Engine - single-owner driver around one order book.
//!
//! The book itself is not reentrant and assumes order ids are unique
//! among live orders. The engine is the serialization point in front of
//! it: it owns the book exclusively, enforces id uniqueness, and turns
//! book results into [`OutputEvent`]s. With the `runtime` feature it can
//! run as a busy-wait loop fed by an rtrb ring buffer.

use log::{info, warn};
use rustc_hash::FxHashMap;

use crate::command::{
    OrderAccepted, OrderRejected, OutputEvent, PlaceOrder, RejectReason, Trade,
};
use crate::config::BookConfig;
use crate::error::BookError;
use crate::order_book::{OrderBook, SubmitOutcome};

/// Pre-reserved trade buffer size; submissions touching more makers grow it.
const TRADE_BUFFER: usize = 64;

/// The main engine that owns one book and processes orders one at a time.
pub struct Engine {
    /// The underlying order book
    book: OrderBook,
    /// Remaining quantity of every live resting order, by id
    live: FxHashMap<u64, u32>,
    /// Reused per-submission trade buffer
    trades: Vec<Trade>,
}

impl Engine {
    /// Create a new engine for the given book configuration.
    pub fn new(config: BookConfig) -> Result<Self, BookError> {
        let capacity = config.capacity as usize * 2;
        Ok(Self {
            book: OrderBook::new(config)?,
            live: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            trades: Vec::with_capacity(TRADE_BUFFER),
        })
    }

    /// Run the engine event loop.
    ///
    /// # Arguments
    /// * `input` - Consumer end of the order ring buffer
    /// * `output` - Producer end of the output event ring buffer
    /// * `pin_to_core` - Whether to pin to the last available CPU core
    ///
    /// # Note
    /// This function runs forever (until the program terminates).
    #[cfg(feature = "runtime")]
    pub fn run(
        &mut self,
        input: &mut rtrb::Consumer<PlaceOrder>,
        output: &mut rtrb::Producer<OutputEvent>,
        pin_to_core: bool,
    ) {
        if pin_to_core {
            self.pin_to_core();
        }

        self.warm_up();

        loop {
            while let Ok(order) = input.pop() {
                let events = self.process_place(order);
                for event in events {
                    // Best effort - drop if full
                    let _ = output.push(event);
                }
            }
            std::hint::spin_loop();
        }
    }

    /// Process a single order and return output events.
    ///
    /// Events are trades in match order, then at most one of
    /// `Accepted` (remainder rests) or `Rejected`. A fully filled order
    /// yields trades only. A zero-quantity order is a no-op and yields no
    /// events, whatever its id or price.
    pub fn process_place(&mut self, order: PlaceOrder) -> Vec<OutputEvent> {
        let mut events = Vec::new();

        if order.qty == 0 {
            return events;
        }

        if self.live.contains_key(&order.order_id) {
            events.push(reject(order.order_id, RejectReason::DuplicateOrderId));
            return events;
        }

        let outcome = match self.book.submit_order(order, &mut self.trades) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("rejecting order {}: {}", order.order_id, err);
                events.push(reject(order.order_id, RejectReason::InvalidPrice));
                return events;
            }
        };

        for trade in &self.trades {
            record_fill(&mut self.live, trade);
            events.push(OutputEvent::Trade(*trade));
        }

        match outcome {
            SubmitOutcome::Ignored | SubmitOutcome::Filled => {}
            SubmitOutcome::Resting { qty } => {
                self.live.insert(order.order_id, qty);
                events.push(OutputEvent::Accepted(OrderAccepted {
                    order_id: order.order_id,
                    price: order.price,
                    qty,
                    side: order.side,
                }));
            }
            SubmitOutcome::Rejected { .. } => {
                events.push(reject(order.order_id, RejectReason::BookFull));
            }
        }

        events
    }

    /// Pin the current thread to the last available CPU core.
    ///
    /// The last core is typically isolated from OS interrupts.
    pub fn pin_to_core(&self) {
        if let Some(core_ids) = core_affinity::get_core_ids() {
            if let Some(last_core) = core_ids.last() {
                if core_affinity::set_for_current(*last_core) {
                    info!("engine pinned to core {}", last_core.id);
                } else {
                    warn!("failed to pin engine to core {}", last_core.id);
                }
            }
        }
    }

    /// Warm up the engine by pre-faulting memory pages.
    pub fn warm_up(&mut self) {
        self.book.warm_up();
        info!(
            "engine warmed up: {} levels per side, {} orders per side",
            self.book.config().num_levels(),
            self.book.config().capacity
        );
    }

    /// Read-only access to the book (inspection and printing)
    #[inline]
    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// True if `order_id` is currently resting
    #[inline]
    pub fn is_live(&self, order_id: u64) -> bool {
        self.live.contains_key(&order_id)
    }

    /// Get the best bid price.
    #[inline]
    pub fn best_bid(&self) -> Option<u64> {
        self.book.best_bid()
    }

    /// Get the best ask price.
    #[inline]
    pub fn best_ask(&self) -> Option<u64> {
        self.book.best_ask()
    }

    /// Get the spread.
    #[inline]
    pub fn spread(&self) -> Option<u64> {
        self.book.spread()
    }

    /// Get total order count.
    #[inline]
    pub fn order_count(&self) -> usize {
        self.book.order_count()
    }

    /// Compute state hash for determinism testing.
    #[inline]
    pub fn state_hash(&self) -> u64 {
        self.book.state_hash()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            book: OrderBook::default(),
            live: FxHashMap::default(),
            trades: Vec::with_capacity(TRADE_BUFFER),
        }
    }
}

/// Mirror a maker fill into the live-order map.
fn record_fill(live: &mut FxHashMap<u64, u32>, trade: &Trade) {
    if let Some(remaining) = live.get_mut(&trade.maker_order_id) {
        *remaining -= trade.qty;
        if *remaining == 0 {
            live.remove(&trade.maker_order_id);
        }
    }
}

fn reject(order_id: u64, reason: RejectReason) -> OutputEvent {
    OutputEvent::Rejected(OrderRejected { order_id, reason })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Side;

    fn engine() -> Engine {
        Engine::new(BookConfig {
            price_min: 9_000,
            price_max: 11_000,
            tick_size: 10,
            capacity: 1_000,
        })
        .unwrap()
    }

    #[test]
    fn test_engine_creation() {
        let engine = engine();
        assert_eq!(engine.order_count(), 0);
        assert_eq!(engine.best_bid(), None);
        assert_eq!(engine.best_ask(), None);
    }

    #[test]
    fn test_engine_process_place() {
        let mut engine = engine();

        let events = engine.process_place(PlaceOrder::bid(1, 10_000, 100));

        assert_eq!(
            events,
            vec![OutputEvent::Accepted(OrderAccepted {
                order_id: 1,
                price: 10_000,
                qty: 100,
                side: Side::Bid,
            })]
        );
        assert_eq!(engine.order_count(), 1);
        assert_eq!(engine.best_bid(), Some(10_000));
        assert!(engine.is_live(1));
    }

    #[test]
    fn test_duplicate_live_id_rejected() {
        let mut engine = engine();
        engine.process_place(PlaceOrder::bid(1, 10_000, 100));

        let events = engine.process_place(PlaceOrder::ask(1, 10_100, 50));

        assert_eq!(events, vec![reject(1, RejectReason::DuplicateOrderId)]);
        assert_eq!(engine.best_ask(), None);
    }

    #[test]
    fn test_id_released_when_maker_filled() {
        let mut engine = engine();
        engine.process_place(PlaceOrder::ask(1, 10_000, 100));

        engine.process_place(PlaceOrder::bid(2, 10_000, 40));
        assert!(engine.is_live(1), "partially filled maker stays live");

        let events = engine.process_place(PlaceOrder::bid(3, 10_000, 60));
        assert!(matches!(events[..], [OutputEvent::Trade(_)]));
        assert!(!engine.is_live(1));

        let events = engine.process_place(PlaceOrder::ask(1, 10_050, 5));
        assert!(matches!(events[..], [OutputEvent::Accepted(_)]));
    }

    #[test]
    fn test_zero_qty_is_silent_even_for_live_id() {
        let mut engine = engine();
        engine.process_place(PlaceOrder::bid(1, 10_000, 100));
        let before = engine.state_hash();

        assert!(engine.process_place(PlaceOrder::ask(1, 10_000, 0)).is_empty());
        assert!(engine.process_place(PlaceOrder::bid(2, 10_005, 0)).is_empty());

        assert!(engine.is_live(1));
        assert!(!engine.is_live(2));
        assert_eq!(engine.state_hash(), before);
    }

    #[test]
    fn test_invalid_price_rejected() {
        let mut engine = engine();
        let events = engine.process_place(PlaceOrder::bid(1, 10_005, 100));
        assert_eq!(events, vec![reject(1, RejectReason::InvalidPrice)]);
        assert_eq!(engine.order_count(), 0);
    }

    #[test]
    fn test_book_full_rejected() {
        let mut engine = Engine::new(BookConfig {
            price_min: 1,
            price_max: 10,
            tick_size: 1,
            capacity: 2,
        })
        .unwrap();
        engine.process_place(PlaceOrder::bid(1, 5, 10));
        engine.process_place(PlaceOrder::bid(2, 5, 10));

        let events = engine.process_place(PlaceOrder::bid(3, 6, 10));

        assert_eq!(events, vec![reject(3, RejectReason::BookFull)]);
        assert!(!engine.is_live(3));
        assert_eq!(engine.best_bid(), Some(5));
    }

    #[test]
    fn test_engine_state_hash_determinism() {
        let mut engine1 = engine();
        let mut engine2 = engine();

        for i in 0..100u64 {
            let order = PlaceOrder {
                order_id: i,
                side: if i % 2 == 0 { Side::Bid } else { Side::Ask },
                price: 10_000 + (i % 10) * 10,
                qty: 100,
            };
            engine1.process_place(order);
            engine2.process_place(order);
        }

        assert_eq!(engine1.state_hash(), engine2.state_hash());
    }

    #[test]
    fn test_engine_warm_up() {
        let mut engine = Engine::default();
        engine.warm_up();
        assert_eq!(engine.order_count(), 0);
    }
}
