use axum::{
    Router,
    extract::{Query, State},
    routing::{get, patch},
};
use axum_helpers::{ApiResponse, AppJson, ErrorResponse, UuidPath, ValidatedJson};
use serde_json::Value;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{ChangePassword, CreateUser, Role, UpdateUser, User, UserFilter};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, get_user, update_user, delete_user, change_password),
    components(schemas(User, Role, CreateUser, UpdateUser, ChangePassword, UserFilter, ErrorResponse)),
    tags(
        (name = "Users", description = "User administration endpoints")
    )
)]
pub struct ApiDoc;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{id}",
            get(get_user)
                .put(update_user)
                .patch(update_user)
                .delete(delete_user),
        )
        .route("/{id}/password", patch(change_password))
        .with_state(shared_service)
}

/// List active users
#[utoipa::path(
    get,
    path = "",
    tag = "Users",
    params(UserFilter),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Success fetch users.", body = ApiResponse<Vec<User>>),
        (status = 401, description = "Unauthenticated.", body = ErrorResponse),
        (status = 403, description = "Forbidden.", body = ErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Query(filter): Query<UserFilter>,
) -> UserResult<ApiResponse<Vec<User>>> {
    let users = service.list_users(filter).await?;
    Ok(ApiResponse::ok("Success fetch users.", users))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "",
    tag = "Users",
    request_body = CreateUser,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Success add users.", body = ApiResponse<User>),
        (status = 400, description = "Validation failed.", body = ErrorResponse),
        (status = 500, description = "Failed add users.", body = ErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<ApiResponse<User>> {
    let user = service.create_user(input).await?;
    Ok(ApiResponse::ok("Success add users.", user))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Success fetch users.", body = ApiResponse<User>),
        (status = 404, description = "User not found.", body = ErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    UuidPath(id): UuidPath,
) -> UserResult<ApiResponse<User>> {
    let user = service.get_user(id).await?;
    Ok(ApiResponse::ok("Success fetch users.", user))
}

/// Update name, email and role
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUser,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Success update users.", body = ApiResponse<User>),
        (status = 400, description = "Validation failed.", body = ErrorResponse),
        (status = 404, description = "User not found.", body = ErrorResponse),
        (status = 500, description = "Failed update users.", body = ErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    UuidPath(id): UuidPath,
    AppJson(body): AppJson<Value>,
) -> UserResult<ApiResponse<User>> {
    let user = service.update_user(id, body).await?;
    Ok(ApiResponse::ok("Success update users.", user))
}

/// Soft-delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Success delete users.", body = ApiResponse<User>),
        (status = 404, description = "User not found.", body = ErrorResponse),
        (status = 500, description = "Failed delete.", body = ErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    UuidPath(id): UuidPath,
) -> UserResult<ApiResponse<User>> {
    let user = service.delete_user(id).await?;
    Ok(ApiResponse::ok("Success delete users.", user))
}

/// Replace a user's password
#[utoipa::path(
    patch,
    path = "/{id}/password",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = ChangePassword,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Success update user password.", body = ApiResponse<User>),
        (status = 400, description = "Validation failed.", body = ErrorResponse),
        (status = 404, description = "User not found.", body = ErrorResponse),
        (status = 500, description = "Failed update user password.", body = ErrorResponse)
    )
)]
async fn change_password<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    UuidPath(id): UuidPath,
    AppJson(body): AppJson<Value>,
) -> UserResult<ApiResponse<User>> {
    let user = service.change_password(id, body).await?;
    Ok(ApiResponse::ok("Success update user password.", user))
}
