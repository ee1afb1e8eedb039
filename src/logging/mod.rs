//! Logging helpers
//!
//! - `LogThrottle` - rate limiter for repetitive log lines
//! - `ProgressLogger` - throttled scan progress, usable as a progress callback

pub mod throttle;

pub use throttle::{LogThrottle, ProgressLogger};
