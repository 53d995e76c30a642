//! # Tick-LOB
//!
//! A fixed-range, allocation-free limit order book matching core for a
//! single instrument.
//!
//! ## Design Principles
//!
//! - **Single-Writer**: One owner mutates the book (no locks, `&mut self`)
//! - **Dense Ladder**: One pre-built price level per tick, indexed by offset
//! - **Arena Allocation**: Orders live in a per-side slab; no heap activity
//!   after construction
//! - **One Algorithm**: Bids and asks share the matching loop, steered by a
//!   side policy
//!
//! ## Architecture
//!
//! ```text
//! PlaceOrder --> [OrderBook] --match--> [opposite BookSide] --> Trades
//!                     |
//!                     +--rest remainder--> [own BookSide]
//!                                           ladder: [PriceLevel; N]
//!                                           arena:  [OrderNode; capacity]
//! ```

pub mod arena;
pub mod book_side;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod order_book;
pub mod price_level;

// Re-exports for convenience
pub use arena::{Arena, ArenaIndex, OrderNode, NULL_INDEX};
pub use book_side::{BookSide, LevelView, RestingOrder};
pub use command::{
    OrderAccepted, OrderRejected, OutputEvent, PlaceOrder, RejectReason, Side, Trade,
};
pub use config::{BookConfig, MAX_LEVELS};
pub use engine::Engine;
pub use error::BookError;
pub use order_book::{OrderBook, SubmitOutcome, Submission};
pub use price_level::PriceLevel;
