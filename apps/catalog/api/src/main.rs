use axum_helpers::server::{create_production_app, health_router};
use axum_helpers::{InMemoryTokenStore, JwtAuth, RedisTokenStore, TokenStore};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_storage::LocalContentStore;
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::ServeDir;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.run_migrations {
        database::postgres::run_migrations::<migration::Migrator>(&db, config.name).await?;
    }

    let redis = match config.redis.clone() {
        Some(redis_config) => Some(
            database::redis::connect_from_config_with_retry(redis_config, None)
                .await
                .map_err(|e| eyre::eyre!("Redis connection failed: {}", e))?,
        ),
        None => None,
    };

    let token_store: Arc<dyn TokenStore> = match &redis {
        Some(manager) => Arc::new(RedisTokenStore::new(manager.clone())),
        None => {
            if config.environment.is_production() {
                warn!("REDIS_URL not set: tokens are kept in memory and lost on restart");
            }
            Arc::new(InMemoryTokenStore::new())
        }
    };
    let jwt_auth = JwtAuth::new(&config.jwt, token_store);

    let content_store = LocalContentStore::new(config.storage.clone());
    let storage_root = content_store.root().clone();

    let state = AppState {
        config,
        db,
        redis,
        jwt_auth,
        content_store: Arc::new(content_store),
    };

    // Build router with API routes (pass reference, not ownership!)
    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;

    // Merge health endpoints into the app
    // - /health: liveness check with app name/version
    // - /ready: readiness check with actual db/redis health checks
    let mut app = router
        .merge(health_router(state.config.name, state.config.version))
        .merge(api::ready_router(state.clone()));

    // Stored images are served by the app itself unless they live on another host
    let public_url = state.config.storage.public_url.clone();
    if public_url.starts_with('/') && public_url != "/" {
        info!(path = %public_url, root = %storage_root.display(), "Serving stored content");
        app = app.nest_service(&public_url, ServeDir::new(storage_root));
    }

    let server_config = state.config.server.clone();

    info!("Starting catalog API with production-ready shutdown (30s timeout)");

    // Production-ready server with graceful shutdown and cleanup
    // State moves here for cleanup
    create_production_app(
        app,
        &server_config,
        Duration::from_secs(30), // 30s graceful shutdown timeout
        async move {
            info!("Shutting down: closing database connections");

            match state.db.close().await {
                Ok(_) => info!("PostgreSQL connection closed successfully"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }

            if let Some(redis) = state.redis {
                // Redis ConnectionManager closes automatically on drop
                drop(redis);
                info!("Redis connection closed successfully");
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}
