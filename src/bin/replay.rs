//! Replay an order file through the engine.
//!
//! Input is CSV with header `order_id,side,price,qty` (`side` is
//! `bid`/`ask`, `buy`/`sell` also accepted). Trades are written to stdout
//! as CSV; the final book goes to stderr.

use clap::Parser;
use log::{info, warn};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tick_lob::{BookConfig, Engine, OutputEvent, PlaceOrder};

#[derive(Parser, Debug)]
#[command(version, about = "Replay a CSV order file through the order book")]
struct Args {
    /// Order file to replay
    input: PathBuf,
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
    /// Print the final book to stderr
    #[arg(long)]
    print_book: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::try_init();
    let args = Args::parse();

    let mut engine = Engine::new(BookConfig {
        price_min: args.price_min,
        price_max: args.price_max,
        tick_size: args.tick_size,
        capacity: args.capacity,
    })?;

    let mut reader = csv::Reader::from_reader(File::open(&args.input)?);
    let mut writer = csv::Writer::from_writer(io::stdout().lock());

    let mut orders = 0u64;
    let mut trades = 0u64;
    let mut rejected = 0u64;

    for row in reader.deserialize() {
        let order: PlaceOrder = row?;
        orders += 1;

        for event in engine.process_place(order) {
            match event {
                OutputEvent::Trade(trade) => {
                    trades += 1;
                    writer.serialize(trade)?;
                }
                OutputEvent::Rejected(reject) => {
                    rejected += 1;
                    warn!("order {} rejected: {:?}", reject.order_id, reject.reason);
                }
                OutputEvent::Accepted(_) => {}
            }
        }
    }
    writer.flush()?;

    info!(
        "replayed {} orders: {} trades, {} rejected, {} resting",
        orders,
        trades,
        rejected,
        engine.order_count()
    );

    if args.print_book {
        eprint!("{}", engine.book());
    }

    Ok(())
}
