//! Error types for order book operations.
//!
//! Only caller precondition violations are errors. Capacity exhaustion
//! and zero-quantity submissions are reported through
//! [`SubmitOutcome`](crate::order_book::SubmitOutcome) instead.

/// Errors returned by book construction and submission
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookError {
    /// Price lies outside the configured ladder
    #[error("price {price} outside ladder range [{min}, {max}]")]
    PriceOutOfRange {
        /// The rejected price
        price: u64,
        /// Lowest price on the ladder
        min: u64,
        /// Highest price on the ladder
        max: u64,
    },

    /// Price is inside the range but not on the tick grid
    #[error("price {price} is not a multiple of tick size {tick_size} from {min}")]
    OffTick {
        /// The rejected price
        price: u64,
        /// Configured tick size
        tick_size: u64,
        /// Grid origin
        min: u64,
    },

    /// Book configuration cannot describe a valid ladder
    #[error("invalid book configuration: {0}")]
    InvalidConfig(&'static str),
}
