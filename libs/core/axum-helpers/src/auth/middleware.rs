use super::jwt::{JwtAuth, JwtClaims};
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Bearer token from `Authorization`, falling back to an `access_token` cookie
fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .or_else(|| {
            headers
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .and_then(|cookies| {
                    cookies.split(';').find_map(|cookie| {
                        let (name, value) = cookie.trim().split_once('=')?;
                        (name == "access_token").then(|| value.to_string())
                    })
                })
        })
        .filter(|token| !token.is_empty())
}

/// Rejects requests without a valid, whitelisted token.
///
/// On success the decoded [`JwtClaims`] are placed in the request extensions.
///
/// ```ignore
/// let protected = Router::new()
///     .route("/products", get(list))
///     .layer(axum::middleware::from_fn_with_state(auth.clone(), jwt_auth_middleware));
/// ```
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_token_from_request(request.headers()) else {
        return AppError::Unauthorized("No token provided".into()).into_response();
    };

    let claims = match auth.verify_token(&token) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("JWT verification failed: {}", e);
            return AppError::Unauthorized("Invalid token".into()).into_response();
        }
    };

    match auth.is_token_whitelisted(&claims.jti).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::debug!(jti = %claims.jti, "Token is not whitelisted");
            return AppError::Unauthorized("Token has been revoked".into()).into_response();
        }
        Err(e) => {
            return AppError::InternalServerError(format!("Token store unavailable: {}", e))
                .into_response();
        }
    }

    request.extensions_mut().insert(claims);
    next.run(request).await
}

/// Only lets through callers whose token carries `role`.
///
/// Must run after [`jwt_auth_middleware`].
///
/// ```ignore
/// let admin_only = Router::new()
///     .route("/users", get(list_users))
///     .layer(axum::middleware::from_fn_with_state("ADMIN", require_role));
/// ```
pub async fn require_role(
    State(role): State<&'static str>,
    request: Request,
    next: Next,
) -> Response {
    let Some(claims) = request.extensions().get::<JwtClaims>() else {
        return AppError::Unauthorized("No token provided".into()).into_response();
    };

    if !claims.role.eq_ignore_ascii_case(role) {
        tracing::info!(user_id = %claims.sub, required = role, "Role check failed");
        return AppError::Forbidden(format!("Requires {} role", role)).into_response();
    }

    next.run(request).await
}
