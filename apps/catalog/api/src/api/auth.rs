use axum::Router;
use domain_users::{AuthService, UserRepository, auth_handlers};
use std::sync::Arc;

/// `/login`, reachable without a token
pub fn public_router<R: UserRepository + 'static>(auth: Arc<AuthService<R>>) -> Router {
    auth_handlers::public_router(auth)
}

/// `/logout`, mounted inside the token guard
pub fn session_router<R: UserRepository + 'static>(auth: Arc<AuthService<R>>) -> Router {
    auth_handlers::session_router(auth)
}
