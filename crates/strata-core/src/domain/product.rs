//! Product entity.

use crate::ProductId;
use serde::{Deserialize, Serialize};

/// A persisted product.
///
/// Always carries the identifier assigned by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Product {
    /// Unique identifier.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unit price.
    pub price: f64,
}

impl Product {
    /// Creates a product with a known identifier.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            price,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A product that has not been persisted yet.
///
/// `id` is `None` when the record store should assign one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub id: Option<ProductId>,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

impl NewProduct {
    /// Creates a new product without an identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            price,
        }
    }

    /// Attaches the identifier chosen by the store (or the caller).
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
        }
    }
}
