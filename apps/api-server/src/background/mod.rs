//! Background jobs.

mod sweep;

pub use sweep::{SweepConfig, Sweeper};
