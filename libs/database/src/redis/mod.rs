//! Redis connection used for the bearer-token whitelist

mod config;
mod connector;

pub use config::RedisConfig;
pub use connector::connect_from_config_with_retry;

pub use redis::aio::ConnectionManager;
