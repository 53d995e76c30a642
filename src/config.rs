//! Book configuration - price grid bounds and order capacity.

use serde::{Deserialize, Serialize};

use crate::arena::NULL_INDEX;
use crate::error::BookError;

/// Largest ladder a book will pre-allocate, per side.
pub const MAX_LEVELS: u64 = 1 << 24;

/// Static resource bounds of one order book.
///
/// Both the ladder size and the per-side order capacity are fixed at
/// construction and never grow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookConfig {
    /// Lowest tradable price (inclusive)
    pub price_min: u64,
    /// Highest tradable price (inclusive)
    pub price_max: u64,
    /// Distance between adjacent price levels
    pub tick_size: u64,
    /// Maximum resting orders per side
    pub capacity: u32,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            price_min: 800,
            price_max: 1200,
            tick_size: 1,
            capacity: 1_000,
        }
    }
}

impl BookConfig {
    /// Check that the configuration describes a usable ladder.
    pub fn validate(&self) -> Result<(), BookError> {
        if self.tick_size == 0 {
            return Err(BookError::InvalidConfig("tick_size must be positive"));
        }
        if self.price_min > self.price_max {
            return Err(BookError::InvalidConfig("price_min exceeds price_max"));
        }
        if (self.price_max - self.price_min) % self.tick_size != 0 {
            return Err(BookError::InvalidConfig(
                "price range is not a whole number of ticks",
            ));
        }
        let levels = ((self.price_max - self.price_min) / self.tick_size).checked_add(1);
        if !matches!(levels, Some(n) if n <= MAX_LEVELS) {
            return Err(BookError::InvalidConfig("price range too large"));
        }
        if self.capacity == 0 {
            return Err(BookError::InvalidConfig("capacity must be positive"));
        }
        if self.capacity >= NULL_INDEX {
            return Err(BookError::InvalidConfig("capacity collides with NULL_INDEX"));
        }
        Ok(())
    }

    /// Number of price levels on each side's ladder. Only meaningful for a
    /// config that passed [`validate`](Self::validate).
    #[inline]
    pub fn num_levels(&self) -> usize {
        ((self.price_max - self.price_min) / self.tick_size) as usize + 1
    }

    /// Map a price onto its ladder index. Never clamps.
    #[inline]
    pub fn price_to_index(&self, price: u64) -> Result<usize, BookError> {
        if price < self.price_min || price > self.price_max {
            return Err(BookError::PriceOutOfRange {
                price,
                min: self.price_min,
                max: self.price_max,
            });
        }
        let offset = price - self.price_min;
        if offset % self.tick_size != 0 {
            return Err(BookError::OffTick {
                price,
                tick_size: self.tick_size,
                min: self.price_min,
            });
        }
        Ok((offset / self.tick_size) as usize)
    }

    /// Price of the level at `index`
    #[inline]
    pub fn index_to_price(&self, index: usize) -> u64 {
        debug_assert!(index < self.num_levels());
        self.price_min + index as u64 * self.tick_size
    }
}
