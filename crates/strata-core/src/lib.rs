//! # Strata Core
//!
//! Core types, traits, and error definitions for the Strata product cache
//! service. Every other crate in the workspace builds on the abstractions
//! defined here.

pub mod domain;
pub mod error;
pub mod id;
pub mod result;
pub mod telemetry;
pub mod traits;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use traits::*;
pub use validation::*;
