//! `/login` (public) and `/logout` (behind the JWT middleware).

use axum::{Extension, Router, extract::State, routing::post};
use axum_helpers::{ApiResponse, ErrorResponse, JwtClaims, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::auth::AuthService;
use crate::error::UserResult;
use crate::models::{LoginRequest, TokenResponse};
use crate::repository::UserRepository;

/// OpenAPI documentation for Auth API
#[derive(OpenApi)]
#[openapi(
    paths(login, logout),
    components(schemas(LoginRequest, TokenResponse, ErrorResponse)),
    tags(
        (name = "Auth", description = "Token issue and revocation")
    )
)]
pub struct ApiDoc;

/// Routes that need no token
pub fn public_router<R: UserRepository + 'static>(auth: Arc<AuthService<R>>) -> Router {
    Router::new().route("/login", post(login)).with_state(auth)
}

/// Routes that must sit behind `jwt_auth_middleware`
pub fn session_router<R: UserRepository + 'static>(auth: Arc<AuthService<R>>) -> Router {
    Router::new().route("/logout", post(logout)).with_state(auth)
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Success login.", body = ApiResponse<TokenResponse>),
        (status = 400, description = "User not found. / Wrong password. / Validation failed.", body = ErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    State(auth): State<Arc<AuthService<R>>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<ApiResponse<TokenResponse>> {
    let token = auth.login(input).await?;
    Ok(ApiResponse::ok("Success login.", token))
}

/// Revoke the presented token
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Success logout."),
        (status = 401, description = "Unauthenticated.", body = ErrorResponse)
    )
)]
async fn logout<R: UserRepository>(
    State(auth): State<Arc<AuthService<R>>>,
    Extension(claims): Extension<JwtClaims>,
) -> UserResult<ApiResponse<()>> {
    auth.logout(&claims).await?;
    Ok(ApiResponse::message("Success logout."))
}
