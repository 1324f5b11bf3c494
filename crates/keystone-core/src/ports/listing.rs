//! Listing data provider port.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::UpstreamError;

/// Upstream real-estate data source (property details, search, valuations).
///
/// Implementations own their timeouts and must report a provider-side
/// rate limit as [`UpstreamError::RateLimited`].
#[async_trait]
pub trait ListingProvider: Send + Sync {
    /// Full property record for a Zillow property id.
    async fn property_details(&self, zpid: &str) -> Result<Value, UpstreamError>;

    /// Listings matching a free-form location ("Austin, TX", a zip code, ...).
    async fn search_location(&self, location: &str) -> Result<Value, UpstreamError>;

    /// Automated valuation for a property.
    async fn zestimate(&self, zpid: &str) -> Result<Value, UpstreamError>;
}
