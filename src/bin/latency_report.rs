use clap::Parser;
use hdrhistogram::Histogram;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};
use tick_lob::{BookConfig, OrderBook, PlaceOrder, Side, SubmitOutcome, Trade};

/// Random-workload latency report for the order book core
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of orders to submit
    #[arg(long, default_value_t = 1_000_000)]
    orders: u64,
    /// Workload PRNG seed
    #[arg(long, default_value_t = 5)]
    seed: u64,
    /// Lowest ladder price
    #[arg(long, default_value_t = 800)]
    price_min: u64,
    /// Highest ladder price
    #[arg(long, default_value_t = 1200)]
    price_max: u64,
    /// Tick size
    #[arg(long, default_value_t = 1)]
    tick_size: u64,
    /// Resting order capacity per side
    #[arg(long, default_value_t = 1_000)]
    capacity: u32,
    /// Largest order quantity generated
    #[arg(long, default_value_t = 10)]
    max_qty: u32,
}

fn generate(args: &Args, config: &BookConfig) -> Vec<PlaceOrder> {
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let ticks = config.num_levels();

    (0..args.orders)
        .map(|order_id| PlaceOrder {
            order_id,
            side: if rng.gen_bool(0.5) { Side::Bid } else { Side::Ask },
            price: config.index_to_price(rng.gen_range(0..ticks)),
            qty: rng.gen_range(1..=args.max_qty),
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::try_init();
    let args = Args::parse();

    let config = BookConfig {
        price_min: args.price_min,
        price_max: args.price_max,
        tick_size: args.tick_size,
        capacity: args.capacity,
    };
    let mut book = OrderBook::new(config)?;
    book.warm_up();

    println!("Preparing {} orders (seed {})...", args.orders, args.seed);
    let workload = generate(&args, &config);

    let mut histogram = Histogram::<u64>::new_with_bounds(1, 1_000_000, 3)?;
    let mut trades: Vec<Trade> = Vec::with_capacity(64);
    let mut trade_count = 0u64;
    let mut rejected = 0u64;
    let mut total_duration = Duration::ZERO;

    for order in workload {
        // Critical measurement section
        let start = Instant::now();
        let outcome = std::hint::black_box(book.submit_order(order, &mut trades))?;
        let elapsed = start.elapsed();

        // Outliers above the histogram bound are dropped, not fatal
        histogram.record(elapsed.as_nanos() as u64).unwrap_or(());
        total_duration += elapsed;

        trade_count += trades.len() as u64;
        if matches!(outcome, SubmitOutcome::Rejected { .. }) {
            rejected += 1;
        }
    }

    println!("\n=== Latency Report (ns) ===");
    println!("Total Ops:  {}", args.orders);
    println!("Elapsed:    {:.3} s", total_duration.as_secs_f64());
    println!("Throughput: {:.2} ops/sec", args.orders as f64 / total_duration.as_secs_f64());
    println!("Trades:     {}", trade_count);
    println!("Rejected:   {} (book full)", rejected);
    println!("Resting:    {}", book.order_count());
    println!("---------------------------");
    println!("Min:    {:6} ns", histogram.min());
    println!("P50:    {:6} ns", histogram.value_at_quantile(0.50));
    println!("P90:    {:6} ns", histogram.value_at_quantile(0.90));
    println!("P99:    {:6} ns", histogram.value_at_quantile(0.99));
    println!("P99.9:  {:6} ns", histogram.value_at_quantile(0.999));
    println!("P99.99: {:6} ns", histogram.value_at_quantile(0.9999));
    println!("Max:    {:6} ns", histogram.max());
    println!("---------------------------");

    println!("\nDistribution:");
    for v in histogram.iter_log(100, 2.0) {
        let count = v.count_since_last_iteration();
        if count > 0 {
            println!("<= {:8} ns: {:10} count", v.value_iterated_to(), count);
        }
    }

    Ok(())
}
