//! Zillow listing data via RapidAPI.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use keystone_core::UpstreamError;
use keystone_core::ports::ListingProvider;

/// RapidAPI connection configuration.
#[derive(Debug, Clone)]
pub struct RapidApiConfig {
    pub api_key: String,
    /// Value of the `X-RapidAPI-Host` header.
    pub host: String,
    pub base_url: String,
    /// Per-request timeout. The gate itself never times out.
    pub timeout: Duration,
}

impl Default for RapidApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            host: "zillow-com1.p.rapidapi.com".to_string(),
            base_url: "https://zillow-com1.p.rapidapi.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl RapidApiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("RAPIDAPI_KEY").unwrap_or_default(),
            host: std::env::var("RAPIDAPI_HOST").unwrap_or(defaults.host),
            base_url: std::env::var("RAPIDAPI_BASE_URL").unwrap_or(defaults.base_url),
            timeout: std::env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// [`ListingProvider`] backed by the Zillow RapidAPI endpoints.
pub struct RapidApiListingProvider {
    client: Client,
    config: RapidApiConfig,
}

impl RapidApiListingProvider {
    pub fn new(config: RapidApiConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, UpstreamError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);

        let response = self
            .client
            .get(&url)
            .header("X-RapidAPI-Key", &self.config.api_key)
            .header("X-RapidAPI-Host", &self.config.host)
            .query(query)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(path = %path, "RapidAPI quota exhausted");
            return Err(UpstreamError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ListingProvider for RapidApiListingProvider {
    async fn property_details(&self, zpid: &str) -> Result<Value, UpstreamError> {
        self.get_json("/property", &[("zpid", zpid)]).await
    }

    async fn search_location(&self, location: &str) -> Result<Value, UpstreamError> {
        self.get_json(
            "/propertyExtendedSearch",
            &[("location", location), ("home_type", "Houses")],
        )
        .await
    }

    async fn zestimate(&self, zpid: &str) -> Result<Value, UpstreamError> {
        self.get_json("/zestimate", &[("zpid", zpid)]).await
    }
}
