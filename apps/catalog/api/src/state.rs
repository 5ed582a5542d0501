//! Application state management.
//!
//! Shared by the route builders in [`crate::api`] and the shutdown hook.

use axum_helpers::JwtAuth;
use core_storage::ContentStore;
use std::sync::Arc;

/// Shared application state.
///
/// Cloning is cheap: the connections are pools/handles and the rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: database::postgres::DatabaseConnection,
    /// Redis connection manager, present only when `REDIS_URL` is set
    pub redis: Option<database::redis::ConnectionManager>,
    /// Token issuing and whitelist checks
    pub jwt_auth: JwtAuth,
    /// Where product images are written
    pub content_store: Arc<dyn ContentStore>,
}
