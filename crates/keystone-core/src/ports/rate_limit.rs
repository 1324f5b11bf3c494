//! Rate limiting port.

use std::num::NonZeroU32;
use std::time::Duration;

use crate::error::PolicyError;

/// Rate limiter trait - abstraction over rate limiting backends.
///
/// Checks are synchronous so that a check-and-increment never straddles an
/// await point.
pub trait RateLimiter: Send + Sync {
    /// Check if a request from `client_id` is allowed and update its counter.
    fn allow(&self, client_id: &str, policy: &RateLimitPolicy) -> RateLimitDecision;

    /// Drop bookkeeping for clients whose window has already elapsed.
    /// Returns the number of entries removed.
    fn purge_expired(&self) -> usize;

    /// Number of tracked client identities.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Maximum requests per fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    limit: NonZeroU32,
    window: Duration,
}

impl RateLimitPolicy {
    pub fn new(limit: u32, window: Duration) -> Result<Self, PolicyError> {
        let limit = NonZeroU32::new(limit).ok_or(PolicyError::ZeroLimit)?;
        if window.is_zero() {
            return Err(PolicyError::ZeroWindow);
        }
        Ok(Self { limit, window })
    }

    pub fn limit(&self) -> u32 {
        self.limit.get()
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests left in the current window after this one.
    pub remaining: u32,
    /// Time until the current window closes.
    pub reset_after: Duration,
}
