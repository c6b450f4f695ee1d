//! # Strata Config
//!
//! Configuration management for Strata.
//! Supports layered configuration from files and environment variables,
//! validation of the assembled tree, and runtime refresh.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
