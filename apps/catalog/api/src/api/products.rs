use axum::{Router, middleware};
use axum_helpers::require_role;
use domain_products::{ProductRepository, ProductService, handlers};
use std::sync::Arc;

use super::ADMIN;

/// Any signed-in user may read; only admins may change the catalog
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let service = Arc::new(service);

    handlers::read_router(service.clone()).merge(
        handlers::write_router(service)
            .route_layer(middleware::from_fn_with_state(ADMIN, require_role)),
    )
}
