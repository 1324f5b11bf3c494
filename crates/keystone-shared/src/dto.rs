//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query string for `GET /api/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub location: String,
}

impl SearchQuery {
    /// Cache-friendly form of the location: trimmed and lower-cased.
    pub fn normalized_location(&self) -> String {
        self.location.trim().to_lowercase()
    }
}

/// Placeholder valuation served when the provider is unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZestimateFallback {
    pub zpid: String,
    pub zestimate: Option<f64>,
    pub is_fallback: bool,
}

impl ZestimateFallback {
    pub fn new(zpid: impl Into<String>) -> Self {
        Self {
            zpid: zpid.into(),
            zestimate: None,
            is_fallback: true,
        }
    }
}

/// Empty search result served when the provider is unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFallback {
    pub results: Vec<Value>,
    pub is_fallback: bool,
}

impl Default for SearchFallback {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            is_fallback: true,
        }
    }
}

/// Liveness payload for `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
    pub cached_entries: usize,
    pub tracked_clients: usize,
}
