//! HTTP-level tests for the users and auth routers backed by in-memory stores.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::{Router, middleware};
use axum_helpers::{InMemoryTokenStore, JwtAuth, JwtConfig, jwt_auth_middleware};
use domain_users::{
    AuthService, InMemoryUserRepository, Role, User, UserRepository, UserService, auth_handlers,
    handlers, password::hash_password,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn seeded_repo() -> InMemoryUserRepository {
    let repo = InMemoryUserRepository::new();
    repo.create(User::new(
        "Super Admin".into(),
        "superadmin@vascomm.co.id".into(),
        hash_password("vascomm123").unwrap(),
        Role::Admin,
    ))
    .await
    .unwrap();
    repo
}

fn auth_app(repo: InMemoryUserRepository) -> Router {
    let config = JwtConfig::new("users-api-test-secret-0123456789abcdef").unwrap();
    let jwt = JwtAuth::new(&config, Arc::new(InMemoryTokenStore::new()));
    let auth = Arc::new(AuthService::new(repo, jwt.clone()));

    auth_handlers::public_router(auth.clone()).merge(
        auth_handlers::session_router(auth)
            .layer(middleware::from_fn_with_state(jwt, jwt_auth_middleware)),
    )
}

fn login_body(email: &str, password: &str) -> Option<Value> {
    Some(json!({ "email": email, "password": password }))
}

#[tokio::test]
async fn test_login_then_logout_twice() {
    let app = auth_app(seeded_repo().await);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/login",
            None,
            login_body("superadmin@vascomm.co.id", "vascomm123"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Success login.");
    assert_eq!(body["data"]["tokenType"], "Bearer");
    let token = body["data"]["accessToken"].as_str().unwrap().to_string();
    assert!(!token.is_empty());

    let response = app
        .clone()
        .oneshot(request("POST", "/logout", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Success logout.");

    let response = app
        .oneshot(request("POST", "/logout", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_error_messages() {
    let app = auth_app(seeded_repo().await);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/login",
            None,
            login_body("superadmin@vascomm.co.id", "nope"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response.into_body()).await["message"], "Wrong password.");

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/login",
            None,
            login_body("ghost@vascomm.co.id", "vascomm123"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response.into_body()).await["message"], "User not found.");

    let response = app
        .oneshot(request("POST", "/login", None, login_body("not-an-email", "")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response.into_body()).await["message"], "Validation failed.");
}

#[tokio::test]
async fn test_user_crud_flow() {
    let app = handlers::router(UserService::new(seeded_repo().await));

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/",
            None,
            Some(json!({
                "name": "jane doe",
                "email": "jane@vascomm.co.id",
                "password": "secret123",
                "password_confirmation": "secret123",
                "role": "USER"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Success add users.");
    assert_eq!(body["data"]["name"], "Jane Doe");
    assert!(body["data"].get("password_hash").is_none());
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/{}", id),
            None,
            Some(json!({ "name": "jane smith", "email": "jane@vascomm.co.id", "role": "ADMIN" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["data"]["name"], "Jane Smith");
    assert_eq!(body["data"]["role"], "ADMIN");

    let response = app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/{}/password", id),
            None,
            Some(json!({ "password": "n3w", "password_confirmation": "n3w" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response.into_body()).await["message"],
        "Success update user password."
    );

    let response = app
        .clone()
        .oneshot(request("DELETE", &format!("/{}", id), None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Success delete users.");
    assert!(body["data"]["deleted_at"].is_string());

    let response = app
        .clone()
        .oneshot(request("GET", &format!("/{}", id), None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response.into_body()).await["message"], "User not found.");

    let response = app.oneshot(request("GET", "/", None, None)).await.unwrap();
    let body = json_body(response.into_body()).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_email_is_bad_request() {
    let app = handlers::router(UserService::new(seeded_repo().await));

    let response = app
        .oneshot(request(
            "POST",
            "/",
            None,
            Some(json!({
                "name": "Another Admin",
                "email": "superadmin@vascomm.co.id",
                "password": "x",
                "password_confirmation": "x",
                "role": "ADMIN"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["code"], 400);
    assert!(body["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn test_update_unknown_user_is_not_found_before_validation() {
    let app = handlers::router(UserService::new(seeded_repo().await));

    let response = app
        .oneshot(request(
            "PUT",
            "/0193a1b2-0000-7000-8000-0000000000ff",
            None,
            Some(json!({})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mistyped_update_body_checks_existence_first() {
    let repo = seeded_repo().await;
    let admin = repo
        .get_by_email("superadmin@vascomm.co.id")
        .await
        .unwrap()
        .unwrap();
    let app = handlers::router(UserService::new(repo));
    let mistyped = json!({ "name": 42, "email": "x@vascomm.co.id", "role": "USER" });

    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            "/0193a1b2-0000-7000-8000-0000000000ff",
            None,
            Some(mistyped.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(request("PUT", &format!("/{}", admin.id), None, Some(mistyped)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response.into_body()).await["message"], "Validation failed.");

    let response = app
        .oneshot(request(
            "PATCH",
            "/0193a1b2-0000-7000-8000-0000000000ff/password",
            None,
            Some(json!({ "password": 1234 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
