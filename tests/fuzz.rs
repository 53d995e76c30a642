//! Fuzz Test - Compares the ladder book against a reference implementation.
//!
//! Uses a naive but correct BTreeMap book to verify the optimized
//! book produces identical trades and best prices.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, VecDeque};
use tick_lob::{BookConfig, OrderBook, PlaceOrder, Side, Trade};

/// Simple reference implementation for verification
struct ReferenceBook {
    bids: BTreeMap<u64, VecDeque<(u64, u32)>>, // price -> [(order_id, qty)]
    asks: BTreeMap<u64, VecDeque<(u64, u32)>>,
}

impl ReferenceBook {
    fn new() -> Self {
        Self {
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
        }
    }

    fn best_bid(&self) -> Option<u64> {
        self.bids.keys().next_back().copied()
    }

    fn best_ask(&self) -> Option<u64> {
        self.asks.keys().next().copied()
    }

    fn place(&mut self, order: PlaceOrder) -> Vec<Trade> {
        let mut trades = Vec::new();
        let mut qty = order.qty;

        loop {
            let best = match order.side {
                Side::Bid => self.best_ask().filter(|&p| p <= order.price),
                Side::Ask => self.best_bid().filter(|&p| p >= order.price),
            };
            let Some(price) = best else { break };
            if qty == 0 {
                break;
            }

            let book = match order.side {
                Side::Bid => &mut self.asks,
                Side::Ask => &mut self.bids,
            };
            let queue = book.get_mut(&price).unwrap();
            while qty > 0 {
                let Some(front) = queue.front_mut() else { break };
                let trade_qty = front.1.min(qty);
                trades.push(Trade {
                    taker_order_id: order.order_id,
                    maker_order_id: front.0,
                    price,
                    qty: trade_qty,
                    taker_side: order.side,
                });
                front.1 -= trade_qty;
                qty -= trade_qty;
                if front.1 == 0 {
                    queue.pop_front();
                }
            }
            if queue.is_empty() {
                book.remove(&price);
            }
        }

        if qty > 0 {
            let book = match order.side {
                Side::Bid => &mut self.bids,
                Side::Ask => &mut self.asks,
            };
            book.entry(order.price).or_default().push_back((order.order_id, qty));
        }

        trades
    }

    fn level_qty(&self, side: Side, price: u64) -> u64 {
        let book = match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        };
        book.get(&price)
            .map(|q| q.iter().map(|&(_, qty)| qty as u64).sum())
            .unwrap_or(0)
    }
}

fn config() -> BookConfig {
    BookConfig {
        price_min: 9_800,
        price_max: 10_200,
        tick_size: 5,
        capacity: 100_000,
    }
}

fn generate_order(rng: &mut ChaCha8Rng, order_id: u64) -> PlaceOrder {
    PlaceOrder {
        order_id,
        side: if rng.gen_bool(0.5) { Side::Bid } else { Side::Ask },
        price: 9_800 + rng.gen_range(0..=80) * 5,
        qty: rng.gen_range(1..200),
    }
}

#[test]
fn test_fuzz_trades_and_best_prices() {
    const SEED: u64 = 0xFEEDFACE;
    const OPS: u64 = 20_000;

    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let mut book = OrderBook::new(config()).unwrap();
    let mut reference = ReferenceBook::new();
    let mut trades = Vec::new();

    for order_id in 0..OPS {
        let order = generate_order(&mut rng, order_id);

        book.submit_order(order, &mut trades).unwrap();
        let expected = reference.place(order);

        assert_eq!(trades, expected, "Trade mismatch at op {}", order_id);
        assert_eq!(
            book.best_bid(),
            reference.best_bid(),
            "Best bid mismatch at op {}",
            order_id
        );
        assert_eq!(
            book.best_ask(),
            reference.best_ask(),
            "Best ask mismatch at op {}",
            order_id
        );
    }

    // Final depth agrees level by level
    for side in [Side::Bid, Side::Ask] {
        for level in book.side(side).levels() {
            assert_eq!(level.total_qty(), reference.level_qty(side, level.price()));
        }
    }
}

#[test]
fn test_fuzz_narrow_ladder_heavy_crossing() {
    // Five ticks: almost every order crosses, levels drain and refill constantly
    let config = BookConfig {
        price_min: 100,
        price_max: 104,
        tick_size: 1,
        capacity: 10_000,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut book = OrderBook::new(config).unwrap();
    let mut reference = ReferenceBook::new();
    let mut trades = Vec::new();

    for order_id in 0..10_000 {
        let order = PlaceOrder {
            order_id,
            side: if rng.gen_bool(0.5) { Side::Bid } else { Side::Ask },
            price: rng.gen_range(100..=104),
            qty: rng.gen_range(1..=10),
        };

        book.submit_order(order, &mut trades).unwrap();
        assert_eq!(trades, reference.place(order), "Trade mismatch at op {}", order_id);
        assert_eq!(book.best_bid(), reference.best_bid());
        assert_eq!(book.best_ask(), reference.best_ask());
    }
}
