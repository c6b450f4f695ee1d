//! # Strata Server Library
//!
//! Wires configuration, the record store, the cache tiers and the REST
//! router into a runnable application.

pub mod app;
pub mod metrics;
pub mod startup;

pub use app::{AppBuilder, Application};
