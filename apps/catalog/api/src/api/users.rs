use axum::{Router, middleware};
use axum_helpers::require_role;
use domain_users::{UserRepository, UserService, handlers};

use super::ADMIN;

pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    handlers::router(service).route_layer(middleware::from_fn_with_state(ADMIN, require_role))
}
