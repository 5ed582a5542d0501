//! Bearer-token authentication.
//!
//! - [`JwtAuth`] signs HS256 tokens and tracks their ids in a [`TokenStore`]
//! - [`jwt_auth_middleware`] guards routes and exposes [`JwtClaims`] as a request extension
//! - [`require_role`] narrows a guarded router to one role
//!
//! ```ignore
//! use axum_helpers::auth::{InMemoryTokenStore, JwtAuth, JwtConfig, jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?, Arc::new(InMemoryTokenStore::new()));
//! let protected = Router::new()
//!     .route("/logout", post(logout))
//!     .layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;
pub mod store;

pub use config::{DEFAULT_TOKEN_TTL_SECS, JwtConfig};
pub use jwt::{JwtAuth, JwtClaims, TokenSubject};
pub use middleware::{jwt_auth_middleware, require_role};
pub use store::{InMemoryTokenStore, RedisTokenStore, TokenStore};
