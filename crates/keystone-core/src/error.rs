//! Gate error types.

use std::time::Duration;

use thiserror::Error;

/// Failures reported by [`GuardedFetch`](crate::gate::GuardedFetch).
#[derive(Debug, Error)]
pub enum GateError {
    /// The calling client used up its allowance for the current window.
    #[error("Rate limit exceeded, retry after {}s", retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    /// The upstream provider refused the call because our own quota is spent.
    #[error("Upstream provider is rate limiting requests")]
    UpstreamRateLimited,

    #[error("Upstream request failed: {0}")]
    Upstream(#[source] UpstreamError),
}

/// Errors produced by an upstream fetch.
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    /// The provider answered with a rate-limit signal (HTTP 429).
    #[error("Upstream rate limited")]
    RateLimited,

    #[error("Upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed upstream response: {0}")]
    Decode(String),
}

impl UpstreamError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, UpstreamError::RateLimited)
    }
}

/// Invalid rate-limit or cache policy values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("Request limit must be greater than zero")]
    ZeroLimit,

    #[error("Window length must be greater than zero")]
    ZeroWindow,

    #[error("Cache TTL must be greater than zero")]
    ZeroTtl,
}
