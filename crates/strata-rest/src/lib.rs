//! # Strata REST
//!
//! REST API layer using Axum for the Strata product cache.
//! Provides product CRUD endpoints, health probes, metrics and Swagger UI.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
