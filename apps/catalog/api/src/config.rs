use axum_helpers::JwtConfig;
use core_config::{FromEnv, env_parse_or, server::ServerConfig};
use core_storage::StorageConfig;

// Import database configs from the database library
use database::postgres::PostgresConfig;
use database::redis::RedisConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub name: &'static str,
    pub version: &'static str,
    pub database: PostgresConfig,
    /// Token whitelist backend; tokens stay in process memory when unset
    pub redis: Option<RedisConfig>,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let jwt = JwtConfig::from_env()?; // Required - JWT_SECRET
        let storage = StorageConfig::from_env()?;

        Ok(Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            database,
            redis: RedisConfig::from_env_optional(),
            jwt,
            storage,
            server,
            environment,
            run_migrations: env_parse_or("RUN_MIGRATIONS", true)?,
        })
    }
}
