//! Walk-through of a five-order session: prints the resting book and
//! every trade.

use tick_lob::{BookConfig, OrderBook, PlaceOrder, Trade};

fn print_trades(trades: &[Trade]) {
    for trade in trades {
        println!("Taker Order ID: {}", trade.taker_order_id);
        println!("Maker Order ID: {}", trade.maker_order_id);
        println!("Price: {}", trade.price);
        println!("Quantity: {}", trade.qty);
        println!("===============");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::try_init();

    let mut book = OrderBook::new(BookConfig::default())?;
    let mut all_trades = Vec::new();
    let mut trades = Vec::with_capacity(16);

    let session = [
        PlaceOrder::bid(0, 900, 20),
        PlaceOrder::bid(1, 901, 10),
        PlaceOrder::ask(2, 900, 15),
        PlaceOrder::bid(3, 902, 10),
        PlaceOrder::ask(4, 902, 5),
    ];

    for order in session {
        book.submit_order(order, &mut trades)?;
        all_trades.extend_from_slice(&trades);
    }

    println!("{}", book);
    print_trades(&all_trades);

    Ok(())
}
