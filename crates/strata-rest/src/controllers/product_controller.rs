//! Product controller.

use crate::{
    extractors::{ProductIdPath, ValidatedJson},
    responses::{created, no_content, warning_headers, ApiResult},
    state::AppState,
};
use axum::{extract::State, response::Response, routing::get, Json, Router};
use strata_core::{ErrorResponse, Product};
use strata_service::ProductRequest;
use tracing::debug;

/// Creates the product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// List every product.
#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    responses(
        (status = 200, description = "All products ordered by ID", body = Vec<Product>),
        (status = 404, description = "No products exist", body = ErrorResponse),
        (status = 503, description = "Record store unavailable", body = ErrorResponse)
    )
)]
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    debug!("List products request");

    let products = state.product_service.list_products().await?;
    Ok(Json(products))
}

/// Get a product by ID.
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "The product", body = Product),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    ProductIdPath(id): ProductIdPath,
) -> ApiResult<Json<Product>> {
    debug!("Get product request: {}", id);

    let product = state.product_service.get_product(id).await?;
    Ok(Json(product))
}

/// Create a product.
///
/// Cache tiers that could not be refreshed are reported as `Warning` headers.
#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product,
            headers(("Location" = String, description = "URL of the new product"))),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 409, description = "ID already taken", body = ErrorResponse)
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ProductRequest>,
) -> ApiResult<Response> {
    debug!("Create product request: {}", request.name);

    let outcome = state.product_service.create_product(request).await?;
    let location = format!("/products/{}", outcome.value.id);
    Ok(created(&location, outcome.value, warning_headers(&outcome.warnings)))
}

/// Replace a product.
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product ID")),
    request_body = ProductRequest,
    responses(
        (status = 204, description = "Product updated"),
        (status = 400, description = "Invalid payload or ID mismatch", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    ProductIdPath(id): ProductIdPath,
    ValidatedJson(request): ValidatedJson<ProductRequest>,
) -> ApiResult<Response> {
    debug!("Update product request: {}", id);

    let outcome = state.product_service.update_product(id, request).await?;
    Ok(no_content(warning_headers(&outcome.warnings)))
}

/// Delete a product.
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    ProductIdPath(id): ProductIdPath,
) -> ApiResult<Response> {
    debug!("Delete product request: {}", id);

    let outcome = state.product_service.delete_product(id).await?;
    Ok(no_content(warning_headers(&outcome.warnings)))
}
