//! Listing data providers.

#[cfg(feature = "rapidapi")]
mod rapidapi;

#[cfg(feature = "rapidapi")]
pub use rapidapi::{RapidApiConfig, RapidApiListingProvider};
