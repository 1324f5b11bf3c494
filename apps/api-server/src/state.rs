//! Application state - shared across all handlers.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use keystone_core::clock::{Clock, SystemClock};
use keystone_core::ports::ListingProvider;
use keystone_core::{GuardedFetch, UpstreamError};

use crate::config::{AppConfig, RoutePolicies};

/// Shared application state.
///
/// Exactly one gate exists per process; every worker gets a clone that
/// points at the same limiter and cache.
#[derive(Clone)]
pub struct AppState {
    pub gate: GuardedFetch<Value>,
    pub listings: Arc<dyn ListingProvider>,
    pub policies: RoutePolicies,
}

/// Listing provider used when no upstream credentials are configured.
pub struct UnconfiguredListingProvider;

impl UnconfiguredListingProvider {
    fn unavailable() -> UpstreamError {
        UpstreamError::Transport("listing provider is not configured".to_string())
    }
}

#[async_trait]
impl ListingProvider for UnconfiguredListingProvider {
    async fn property_details(&self, _zpid: &str) -> Result<Value, UpstreamError> {
        Err(Self::unavailable())
    }

    async fn search_location(&self, _location: &str) -> Result<Value, UpstreamError> {
        Err(Self::unavailable())
    }

    async fn zestimate(&self, _zpid: &str) -> Result<Value, UpstreamError> {
        Err(Self::unavailable())
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub fn new(config: &AppConfig, policies: RoutePolicies) -> Self {
        let listings = Self::listing_provider(config);
        Self::with_provider(listings, policies, Arc::new(SystemClock))
    }

    /// Build state around an explicit provider and clock.
    pub fn with_provider(
        listings: Arc<dyn ListingProvider>,
        policies: RoutePolicies,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let gate = keystone_infra::in_memory_gate(clock);

        tracing::info!(
            max_requests = policies.property.rate_limit.limit(),
            window_secs = policies.property.rate_limit.window().as_secs(),
            "Application state initialized"
        );

        Self {
            gate,
            listings,
            policies,
        }
    }

    #[cfg(feature = "rapidapi")]
    fn listing_provider(config: &AppConfig) -> Arc<dyn ListingProvider> {
        use keystone_infra::RapidApiListingProvider;

        if !config.rapidapi.is_configured() {
            tracing::warn!("RAPIDAPI_KEY not set. Upstream calls will fail over to fallbacks.");
            return Arc::new(UnconfiguredListingProvider);
        }

        match RapidApiListingProvider::new(config.rapidapi.clone()) {
            Ok(provider) => Arc::new(provider),
            Err(e) => {
                tracing::error!(
                    "Failed to build RapidAPI client: {}. Using unconfigured provider.",
                    e
                );
                Arc::new(UnconfiguredListingProvider)
            }
        }
    }

    #[cfg(not(feature = "rapidapi"))]
    fn listing_provider(_config: &AppConfig) -> Arc<dyn ListingProvider> {
        tracing::info!("Running without rapidapi feature - upstream calls will fail over to fallbacks");
        Arc::new(UnconfiguredListingProvider)
    }
}
