//! Benchmark harness using Criterion for latency measurement.
//!
//! Measures:
//! - Submit order (no match)
//! - Submit order (full match at one level, varying queue depth)
//! - Sweep across several levels
//! - Mixed random workload

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tick_lob::{BookConfig, OrderBook, PlaceOrder, Side, Trade};

fn config() -> BookConfig {
    BookConfig {
        price_min: 9_000,
        price_max: 11_000,
        tick_size: 1,
        capacity: 100_000,
    }
}

fn book() -> OrderBook {
    let mut book = OrderBook::new(config()).unwrap();
    book.warm_up();
    book
}

/// Benchmark: Submit order that rests and is then taken out again
fn bench_submit_no_match(c: &mut Criterion) {
    let mut book = book();
    let mut trades: Vec<Trade> = Vec::with_capacity(64);
    let mut order_id = 0u64;

    c.bench_function("submit_no_match", |b| {
        b.iter(|| {
            order_id += 2;
            let rest = book.submit_order(PlaceOrder::bid(order_id, 9_500, 100), &mut trades);
            // Keep the arena from filling up
            book.submit_order(PlaceOrder::ask(order_id + 1, 9_500, 100), &mut trades)
                .unwrap();
            black_box(rest)
        })
    });
}

/// Benchmark: Submit order that fully matches the head of a queue
fn bench_submit_full_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit_full_match");

    for depth in [1u64, 10, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            let mut book = book();
            let mut trades: Vec<Trade> = Vec::with_capacity(64);

            for i in 0..depth {
                book.submit_order(PlaceOrder::ask(i, 10_000, 100), &mut trades)
                    .unwrap();
            }

            let mut order_id = 1_000u64;

            b.iter(|| {
                order_id += 2;
                let result = book
                    .submit_order(PlaceOrder::bid(order_id, 10_000, 100), &mut trades)
                    .unwrap();

                // Replenish the matched order
                book.submit_order(PlaceOrder::ask(order_id + 1, 10_000, 100), &mut trades)
                    .unwrap();

                black_box(result)
            })
        });
    }

    group.finish();
}

/// Benchmark: One order sweeping several levels, then refilling them
fn bench_multi_level_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_level_sweep");

    for levels in [1u64, 5, 20] {
        group.bench_with_input(BenchmarkId::from_parameter(levels), &levels, |b, &levels| {
            let mut book = book();
            let mut trades: Vec<Trade> = Vec::with_capacity(64);
            let mut order_id = 0u64;

            let refill = |book: &mut OrderBook, trades: &mut Vec<Trade>, order_id: &mut u64| {
                for level in 0..levels {
                    *order_id += 1;
                    book.submit_order(PlaceOrder::ask(*order_id, 10_000 + level, 10), trades)
                        .unwrap();
                }
            };
            refill(&mut book, &mut trades, &mut order_id);

            b.iter(|| {
                order_id += 1;
                let result = book
                    .submit_order(
                        PlaceOrder::bid(order_id, 10_000 + levels - 1, levels as u32 * 10),
                        &mut trades,
                    )
                    .unwrap();
                refill(&mut book, &mut trades, &mut order_id);
                black_box(result)
            })
        });
    }

    group.finish();
}

/// Benchmark: Random orders around the mid, mixed resting and crossing
fn bench_mixed_workload(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let orders: Vec<PlaceOrder> = (0..10_000u64)
        .map(|order_id| PlaceOrder {
            order_id,
            side: if rng.gen_bool(0.5) { Side::Bid } else { Side::Ask },
            price: rng.gen_range(9_900..=10_100),
            qty: rng.gen_range(1..=10),
        })
        .collect();

    c.bench_function("mixed_10k", |b| {
        b.iter(|| {
            let mut book = OrderBook::new(config()).unwrap();
            let mut trades: Vec<Trade> = Vec::with_capacity(64);
            let mut traded = 0u64;
            for order in &orders {
                book.submit_order(*order, &mut trades).unwrap();
                traded += trades.len() as u64;
            }
            black_box(traded)
        })
    });
}

criterion_group!(
    benches,
    bench_submit_no_match,
    bench_submit_full_match,
    bench_multi_level_sweep,
    bench_mixed_workload
);
criterion_main!(benches);
