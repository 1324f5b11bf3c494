//! # Keystone Infrastructure
//!
//! Concrete implementations of the ports defined in `keystone-core`.
//! This crate contains the in-memory limiter and cache plus the upstream
//! listing-data integration.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `rapidapi` - Zillow listing data through RapidAPI (reqwest)

pub mod cache;
pub mod listing;
pub mod rate_limit;

use std::sync::Arc;

use keystone_core::GuardedFetch;
use keystone_core::clock::Clock;

// Re-exports - In-Memory
pub use cache::InMemoryCache;
pub use rate_limit::InMemoryRateLimiter;

// Re-exports - Upstream
#[cfg(feature = "rapidapi")]
pub use listing::{RapidApiConfig, RapidApiListingProvider};

/// Build a gate over fresh in-memory limiter and cache sharing `clock`.
pub fn in_memory_gate<V>(clock: Arc<dyn Clock>) -> GuardedFetch<V>
where
    V: Clone + Send + Sync + 'static,
{
    GuardedFetch::new(
        Arc::new(InMemoryRateLimiter::with_clock(clock.clone())),
        Arc::new(InMemoryCache::<V>::with_clock(clock)),
    )
}
