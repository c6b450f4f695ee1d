//! OpenAPI documentation configuration.

use crate::controllers::health_controller::{ComponentHealth, HealthResponse, ReadinessResponse};
use strata_core::{ErrorResponse, FieldError, Product, ProductId};
use strata_service::ProductRequest;
use utoipa::OpenApi;

/// OpenAPI documentation for the Strata API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Strata Product API",
        version = "1.0.0",
        description = "Product CRUD behind a local and remote cache tier",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        // Product endpoints
        crate::controllers::product_controller::list_products,
        crate::controllers::product_controller::get_product,
        crate::controllers::product_controller::create_product,
        crate::controllers::product_controller::update_product,
        crate::controllers::product_controller::delete_product,
        // Health endpoints
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            ProductId,
            Product,
            ProductRequest,
            ErrorResponse,
            FieldError,
            HealthResponse,
            ReadinessResponse,
            ComponentHealth,
        )
    ),
    tags(
        (name = "products", description = "Product management endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_product_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/products"));
        assert!(doc.paths.paths.contains_key("/products/{id}"));
        assert!(doc.paths.paths.contains_key("/ready"));
    }
}
