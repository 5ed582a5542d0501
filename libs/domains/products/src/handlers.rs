//! HTTP handlers for Products API

use axum::{
    Router,
    extract::{DefaultBodyLimit, Query, State},
    routing::{get, post, put},
};
use axum_helpers::{ApiResponse, ErrorResponse, UuidPath};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::form::ProductForm;
use crate::models::{Price, Product, ProductFilter, ProductPayload};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// Upper bound for create/update bodies, images included
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(schemas(Product, ProductPayload, Price, ProductFilter, ErrorResponse)),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Read-only product routes
pub fn read_router<R: ProductRepository + 'static>(service: Arc<ProductService<R>>) -> Router {
    Router::new()
        .route("/", get(list_products))
        .route("/{id}", get(get_product))
        .with_state(service)
}

/// Product routes that change data
pub fn write_router<R: ProductRepository + 'static>(service: Arc<ProductService<R>>) -> Router {
    Router::new()
        .route("/", post(create_product))
        .route(
            "/{id}",
            put(update_product)
                .patch(update_product)
                .delete(delete_product),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(service)
}

/// All product routes without any access control
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);
    read_router(shared_service.clone()).merge(write_router(shared_service))
}

/// List products with optional search and paging
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ProductFilter),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Success fetch products.", body = ApiResponse<Vec<Product>>),
        (status = 401, description = "Unauthenticated.", body = ErrorResponse),
        (status = 500, description = "Failed fetch products.", body = ErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(filter): Query<ProductFilter>,
) -> ProductResult<ApiResponse<Vec<Product>>> {
    let products = service.list_products(filter).await?;
    Ok(ApiResponse::ok("Success fetch products.", products))
}

/// Create a product; accepts JSON (base64 image) or multipart (file image)
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = ProductPayload,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Success add products.", body = ApiResponse<Product>),
        (status = 400, description = "Validation failed.", body = ErrorResponse),
        (status = 401, description = "Unauthenticated.", body = ErrorResponse),
        (status = 403, description = "Forbidden.", body = ErrorResponse),
        (status = 500, description = "Failed add products.", body = ErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ProductForm(input): ProductForm,
) -> ProductResult<ApiResponse<Product>> {
    let product = service.create_product(input).await?;
    Ok(ApiResponse::ok("Success add products.", product))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Success fetch products.", body = ApiResponse<Product>),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Product not found.", body = ErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<ApiResponse<Product>> {
    let product = service.get_product(id).await?;
    Ok(ApiResponse::ok("Success fetch products.", product))
}

/// Update a product; omit `image` to keep the current one
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = ProductPayload,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Success update products.", body = ApiResponse<Product>),
        (status = 400, description = "Validation failed.", body = ErrorResponse),
        (status = 404, description = "Product not found.", body = ErrorResponse),
        (status = 500, description = "Failed update products.", body = ErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
    ProductForm(input): ProductForm,
) -> ProductResult<ApiResponse<Product>> {
    let product = service.update_product(id, input).await?;
    Ok(ApiResponse::ok("Success update products.", product))
}

/// Delete a product and return it
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Success delete products.", body = ApiResponse<Product>),
        (status = 404, description = "Product not found.", body = ErrorResponse),
        (status = 500, description = "Failed delete products.", body = ErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<ApiResponse<Product>> {
    let product = service.delete_product(id).await?;
    Ok(ApiResponse::ok("Success delete products.", product))
}
