//! Route guard tests: token checks, revocation and role gating.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::routing::get;
use axum::{Extension, Router, middleware};
use axum_helpers::{
    ApiResponse, InMemoryTokenStore, JwtAuth, JwtClaims, JwtConfig, TokenSubject,
    jwt_auth_middleware, require_role,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn auth() -> JwtAuth {
    let config = JwtConfig::new("middleware-test-secret-0123456789abcdef").unwrap();
    JwtAuth::new(&config, Arc::new(InMemoryTokenStore::new()))
}

async fn whoami(Extension(claims): Extension<JwtClaims>) -> ApiResponse<String> {
    ApiResponse::ok("ok", claims.name)
}

fn app(auth: JwtAuth) -> Router {
    let admin = Router::new()
        .route("/admin", get(whoami))
        .layer(middleware::from_fn_with_state("ADMIN", require_role));

    Router::new()
        .route("/me", get(whoami))
        .merge(admin)
        .layer(middleware::from_fn_with_state(auth, jwt_auth_middleware))
}

async fn token_for(auth: &JwtAuth, role: &str) -> String {
    auth.issue(&TokenSubject {
        user_id: "0193a1b2-0000-7000-8000-000000000002",
        email: "user@vascomm.co.id",
        name: "User",
        role,
    })
    .await
    .unwrap()
}

fn get_with_token(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_missing_token_is_401_envelope() {
    let response = app(auth()).oneshot(get_with_token("/me", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["code"], 401);
    assert_eq!(body["message"], "Unauthenticated.");
}

#[tokio::test]
async fn test_valid_token_exposes_claims() {
    let auth = auth();
    let token = token_for(&auth, "USER").await;

    let response = app(auth).oneshot(get_with_token("/me", Some(&token))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response.into_body()).await["data"], "User");
}

#[tokio::test]
async fn test_revoked_token_is_rejected() {
    let auth = auth();
    let token = token_for(&auth, "USER").await;
    let jti = auth.verify_token(&token).unwrap().jti;
    auth.revoke_token(&jti).await.unwrap();

    let response = app(auth).oneshot(get_with_token("/me", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_role_guard() {
    let auth = auth();
    let user_token = token_for(&auth, "USER").await;
    let admin_token = token_for(&auth, "ADMIN").await;

    let forbidden = app(auth.clone())
        .oneshot(get_with_token("/admin", Some(&user_token)))
        .await
        .unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let allowed = app(auth)
        .oneshot(get_with_token("/admin", Some(&admin_token)))
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);
}
