//! # Strata Repository
//!
//! The record store behind the cache tiers.
//!
//! ```text
//! TieredProductService
//!   ↓  Arc<dyn ProductRepository>   (record store contract)
//! MySqlProductRepository            (MySQL / SQLx)
//!   ↓
//! MySQL
//! ```
//!
//! [`InMemoryProductRepository`] implements the same contract without a
//! database and backs the service and router tests.

pub mod memory;
pub mod mysql;
pub mod pool;
pub mod traits;

pub use memory::InMemoryProductRepository;
pub use mysql::*;
pub use pool::*;
pub use traits::*;
