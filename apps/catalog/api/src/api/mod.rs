use axum::{Router, middleware};
use axum_helpers::{JwtAuth, jwt_auth_middleware};
use domain_products::{PgProductRepository, ProductRepository, ProductService};
use domain_users::{AuthService, PostgresUserRepository, UserRepository, UserService};
use std::sync::Arc;

pub mod auth;
pub mod health;
pub mod products;
pub mod users;

/// Role required for catalog writes and user administration
pub const ADMIN: &str = "ADMIN";

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
///
/// Returns a stateless Router (all sub-routers have state already applied).
pub fn routes(state: &crate::state::AppState) -> Router {
    let user_repository = PostgresUserRepository::new(state.db.clone());
    let product_service = ProductService::new(
        PgProductRepository::new(state.db.clone()),
        state.content_store.clone(),
    );

    compose(state.jwt_auth.clone(), user_repository, product_service)
}

/// Wire the domain routers behind the token and role guards.
///
/// - `/login` is public
/// - everything else needs a whitelisted bearer token
/// - product writes and all of `/users` additionally need [`ADMIN`]
pub fn compose<U, P>(
    jwt_auth: JwtAuth,
    user_repository: U,
    product_service: ProductService<P>,
) -> Router
where
    U: UserRepository + Clone + 'static,
    P: ProductRepository + 'static,
{
    let auth_service = Arc::new(AuthService::new(user_repository.clone(), jwt_auth.clone()));

    let protected = Router::new()
        .merge(auth::session_router(auth_service.clone()))
        .nest("/products", products::router(product_service))
        .nest(
            "/users",
            users::router(UserService::new(user_repository).with_sessions(jwt_auth.clone())),
        )
        .route_layer(middleware::from_fn_with_state(jwt_auth, jwt_auth_middleware));

    Router::new()
        .merge(auth::public_router(auth_service))
        .merge(protected)
}

/// Creates a router with the /ready endpoint that performs actual health checks.
///
/// This router has state applied and can be merged with the stateless app router
/// from `create_router`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
