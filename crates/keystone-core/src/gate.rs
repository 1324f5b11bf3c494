//! Guarded fetch - rate limit, then cache, then upstream.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{GateError, PolicyError, UpstreamError};
use crate::ports::{Cache, RateLimitDecision, RateLimitPolicy, RateLimiter};

/// Per-call limits applied by [`GuardedFetch::fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    pub rate_limit: RateLimitPolicy,
    pub ttl: Duration,
}

impl FetchPolicy {
    pub fn new(rate_limit: RateLimitPolicy, ttl: Duration) -> Result<Self, PolicyError> {
        if ttl.is_zero() {
            return Err(PolicyError::ZeroTtl);
        }
        Ok(Self { rate_limit, ttl })
    }
}

/// Where a fetched value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    Cache,
    Upstream,
    Fallback,
}

impl FetchSource {
    /// Value for the `X-Cache-Status` response header.
    pub fn cache_status(&self) -> &'static str {
        match self {
            FetchSource::Cache => "HIT",
            FetchSource::Upstream => "MISS",
            FetchSource::Fallback => "FALLBACK",
        }
    }
}

/// A value returned by the gate together with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<V> {
    pub value: V,
    pub source: FetchSource,
    /// The caller's allowance after this request was admitted.
    pub rate_limit: RateLimitDecision,
}

impl<V> Fetched<V> {
    pub fn is_fallback(&self) -> bool {
        self.source == FetchSource::Fallback
    }
}

/// Composes a [`RateLimiter`] and a [`Cache`] in front of an arbitrary
/// upstream future.
///
/// The gate never retries, never times out, and does not coalesce
/// concurrent misses for the same key: two callers that miss at the same
/// time both reach upstream and the later write wins.
pub struct GuardedFetch<V> {
    limiter: Arc<dyn RateLimiter>,
    cache: Arc<dyn Cache<V>>,
}

impl<V> Clone for GuardedFetch<V> {
    fn clone(&self) -> Self {
        Self {
            limiter: self.limiter.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<V> GuardedFetch<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(limiter: Arc<dyn RateLimiter>, cache: Arc<dyn Cache<V>>) -> Self {
        Self { limiter, cache }
    }

    pub fn limiter(&self) -> &Arc<dyn RateLimiter> {
        &self.limiter
    }

    pub fn cache(&self) -> &Arc<dyn Cache<V>> {
        &self.cache
    }

    /// Fetch `cache_key` on behalf of `client_id`.
    ///
    /// 1. The client's rate limit is checked first; a denied client gets
    ///    [`GateError::RateLimited`] even if the key is cached.
    /// 2. A live cache entry is returned without calling `upstream`.
    /// 3. Otherwise `upstream` runs exactly once. Successes are cached for
    ///    `policy.ttl`. Failures yield `fallback` when one is given, and the
    ///    fallback is never cached.
    pub async fn fetch<F, Fut>(
        &self,
        client_id: &str,
        cache_key: &str,
        policy: &FetchPolicy,
        upstream: F,
        fallback: Option<V>,
    ) -> Result<Fetched<V>, GateError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, UpstreamError>>,
    {
        let decision = self.limiter.allow(client_id, &policy.rate_limit);
        if !decision.allowed {
            tracing::warn!(
                client_id = %client_id,
                retry_after = ?decision.reset_after,
                "Client rate limit exceeded"
            );
            return Err(GateError::RateLimited {
                retry_after: decision.reset_after,
            });
        }

        if let Some(value) = self.cache.get(cache_key) {
            tracing::debug!(cache_key = %cache_key, "Cache hit");
            return Ok(Fetched {
                value,
                source: FetchSource::Cache,
                rate_limit: decision,
            });
        }

        tracing::debug!(cache_key = %cache_key, "Cache miss, calling upstream");

        match upstream().await {
            Ok(value) => {
                self.cache.put(cache_key, value.clone(), policy.ttl);
                Ok(Fetched {
                    value,
                    source: FetchSource::Upstream,
                    rate_limit: decision,
                })
            }
            Err(err) => match fallback {
                Some(value) => {
                    tracing::warn!(
                        cache_key = %cache_key,
                        error = %err,
                        "Upstream failed, serving fallback"
                    );
                    Ok(Fetched {
                        value,
                        source: FetchSource::Fallback,
                        rate_limit: decision,
                    })
                }
                None if err.is_rate_limited() => Err(GateError::UpstreamRateLimited),
                None => Err(GateError::Upstream(err)),
            },
        }
    }
}
