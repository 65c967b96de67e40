//! Quote engine.
//!
//! Pure, synchronous functions from a [`QuoteRequest`](crate::domain::QuoteRequest)
//! and a [`PricingRules`](crate::pricing::PricingRules) value to a
//! [`QuoteResult`](crate::domain::QuoteResult). No I/O and no shared state, so
//! callers may invoke them concurrently against the same rule set.

mod calculator;
mod conversion;
mod error;
mod surcharge;

pub use calculator::calculate_quote;
pub use conversion::convert_volume;
pub use error::QuoteError;
pub use surcharge::validate_surcharges;
