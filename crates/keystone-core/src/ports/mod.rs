//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod cache;
mod listing;
mod rate_limit;

pub use cache::Cache;
pub use listing::ListingProvider;
pub use rate_limit::{RateLimitDecision, RateLimitPolicy, RateLimiter};
