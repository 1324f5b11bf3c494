//! # Keystone Core
//!
//! The domain layer of the Keystone listing gate.
//! This crate holds the ports and the guarded-fetch composition with zero
//! infrastructure dependencies.

pub mod clock;
pub mod error;
pub mod gate;
pub mod ports;

pub use clock::{Clock, SystemClock};
pub use error::{GateError, PolicyError, UpstreamError};
pub use gate::{FetchPolicy, FetchSource, Fetched, GuardedFetch};

#[cfg(any(test, feature = "testing"))]
pub use clock::ManualClock;
