//! Product-related DTOs.

use serde::{Deserialize, Serialize};
use strata_core::rules::{not_blank, valid_price};
use strata_core::{NewProduct, Product, ProductId};
use utoipa::ToSchema;
use validator::Validate;

/// Body of a create or update request.
///
/// `id` is optional on create; on update it must match the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,

    #[validate(
        length(min = 1, max = 200, message = "Name must be 1-200 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "valid_price"))]
    pub price: f64,
}

impl ProductRequest {
    /// Creates a request without an identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            price,
        }
    }

    /// Sets the identifier.
    #[must_use]
    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Converts into an unsaved product, keeping a caller-chosen id.
    #[must_use]
    pub fn into_new_product(self) -> NewProduct {
        NewProduct {
            id: self.id,
            name: self.name,
            description: self.description,
            price: self.price,
        }
    }

    /// Converts into a product stored under `id`.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        self.into_new_product().into_product(id)
    }
}
