//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use keystone_core::ports::RateLimitPolicy;
use keystone_core::{FetchPolicy, PolicyError};

#[cfg(feature = "rapidapi")]
use keystone_infra::RapidApiConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub gate: GateConfig,
    #[cfg(feature = "rapidapi")]
    pub rapidapi: RapidApiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_parse("PORT").unwrap_or(8080),
            gate: GateConfig::from_env(),
            #[cfg(feature = "rapidapi")]
            rapidapi: RapidApiConfig::from_env(),
        }
    }
}

/// Limits applied by the listing gate.
///
/// One rate-limit window is shared by every proxied route; each route has
/// its own cache lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Maximum requests per client per window.
    pub max_requests: u32,
    pub window: Duration,
    /// Lifetime of cached property details and valuations.
    pub property_ttl: Duration,
    /// Lifetime of cached location searches.
    pub search_ttl: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
            property_ttl: Duration::from_secs(300),
            search_ttl: Duration::from_secs(600),
        }
    }
}

impl GateConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_requests: env_parse("RATE_LIMIT_MAX_REQUESTS").unwrap_or(defaults.max_requests),
            window: env_parse("RATE_LIMIT_WINDOW_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.window),
            property_ttl: env_parse("CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.property_ttl),
            search_ttl: env_parse("SEARCH_CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.search_ttl),
        }
    }

    /// Validate the configuration and build the per-route fetch policies.
    pub fn policies(&self) -> Result<RoutePolicies, PolicyError> {
        let rate_limit = RateLimitPolicy::new(self.max_requests, self.window)?;
        Ok(RoutePolicies {
            property: FetchPolicy::new(rate_limit, self.property_ttl)?,
            search: FetchPolicy::new(rate_limit, self.search_ttl)?,
        })
    }
}

/// Fetch policies per proxied route.
#[derive(Debug, Clone, Copy)]
pub struct RoutePolicies {
    /// Property details and valuations.
    pub property: FetchPolicy,
    pub search: FetchPolicy,
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
