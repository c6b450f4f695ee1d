//! # Strata Service
//!
//! Product use cases behind a tiered cache. Reads consult a process-local
//! tier, then the shared remote tier, then the record store; writes go to
//! the store first and then refresh or invalidate every tier.

pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod product_service;

#[cfg(test)]
mod test_support;

pub use cache::*;
pub use dto::*;
pub use product_service::*;
pub use r#impl::TieredProductService;
