//! Domain entities.
//!
//! The cache core treats these as opaque values: only the identifier is
//! ever inspected.

mod product;

pub use product::*;
