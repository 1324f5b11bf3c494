//! In-memory fixed-window rate limiter.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use keystone_core::clock::{Clock, SystemClock};
use keystone_core::ports::{RateLimitDecision, RateLimitPolicy, RateLimiter};

struct RateLimitEntry {
    count: u32,
    window_started_at: Instant,
    window: Duration,
}

impl RateLimitEntry {
    /// Time left in the entry's window, `None` once it has elapsed.
    ///
    /// Measured from the window start, so a window larger than the clock's
    /// range simply never elapses.
    fn time_left(&self, now: Instant) -> Option<Duration> {
        self.window
            .checked_sub(now.saturating_duration_since(self.window_started_at))
            .filter(|left| !left.is_zero())
    }
}

/// Per-client request counter with fixed windows.
///
/// A client's first request opens a window of `policy.window()`; the counter
/// resets only once that window has fully elapsed.
/// Note: Limits are per-process, not distributed across instances, and every
/// caller reporting the identity `"unknown"` shares one bucket.
pub struct InMemoryRateLimiter {
    counters: Mutex<HashMap<String, RateLimitEntry>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRateLimiter {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            counters: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

impl Default for InMemoryRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter for InMemoryRateLimiter {
    fn allow(&self, client_id: &str, policy: &RateLimitPolicy) -> RateLimitDecision {
        let now = self.clock.now();
        let limit = policy.limit();
        let mut counters = self.counters.lock();

        if let Some(entry) = counters.get_mut(client_id)
            && let Some(reset_after) = entry.time_left(now)
        {
            if entry.count < limit {
                entry.count += 1;
                return RateLimitDecision {
                    allowed: true,
                    remaining: limit - entry.count,
                    reset_after,
                };
            }
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_after,
            };
        }

        // New client or elapsed window
        counters.insert(
            client_id.to_string(),
            RateLimitEntry {
                count: 1,
                window_started_at: now,
                window: policy.window(),
            },
        );

        RateLimitDecision {
            allowed: true,
            remaining: limit - 1,
            reset_after: policy.window(),
        }
    }

    fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut counters = self.counters.lock();
        let before = counters.len();
        counters.retain(|_, entry| entry.time_left(now).is_some());
        before - counters.len()
    }

    fn len(&self) -> usize {
        self.counters.lock().len()
    }
}
