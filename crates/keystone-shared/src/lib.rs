//! # Keystone Shared
//!
//! Wire types shared between the API server and the website frontend.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
