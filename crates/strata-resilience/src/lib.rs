//! # Strata Resilience
//!
//! Guards for calls that leave the process: a circuit breaker that fails
//! fast once a dependency keeps erroring, and a timeout wrapper.

pub mod circuit_breaker;
pub mod timeout;

pub use circuit_breaker::*;
pub use timeout::*;
