//! # Axum Helpers
//!
//! Shared HTTP plumbing for the catalog services.
//!
//! - **[`response`]**: the `{ code, message, data }` success envelope
//! - **[`errors`]**: the `{ code, message, error }` failure envelope and [`AppError`]
//! - **[`extractors`]**: [`ValidatedJson`], [`AppJson`] and [`UuidPath`]
//! - **[`auth`]**: JWT issuing, whitelisting, route guards
//! - **[`http`]**: CORS and security headers
//! - **[`server`]**: router assembly, health checks, graceful shutdown
//! - **[`text`]**: small string helpers shared by the domains

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod response;
pub mod server;
pub mod text;

pub use auth::{
    InMemoryTokenStore, JwtAuth, JwtClaims, JwtConfig, RedisTokenStore, TokenStore, TokenSubject,
    jwt_auth_middleware, require_role,
};
pub use errors::{AppError, ErrorResponse, describe_validation_errors, error_response};
pub use extractors::{AppJson, UuidPath, ValidatedJson};
pub use response::ApiResponse;
pub use server::{
    HealthCheckFuture, ShutdownCoordinator, create_production_app, create_router, health_router,
    run_health_checks,
};
pub use text::title_case;
