//! Data Transfer Objects (DTOs).

mod product_dto;
mod write_outcome;

pub use product_dto::*;
pub use write_outcome::*;
