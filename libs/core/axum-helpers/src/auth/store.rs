use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Whitelist of live token ids.
///
/// A token is accepted only while its `jti` is present; logout removes it.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn whitelist(&self, jti: &str, user_id: &str, ttl_secs: u64) -> eyre::Result<()>;

    async fn is_whitelisted(&self, jti: &str) -> eyre::Result<bool>;

    async fn revoke(&self, jti: &str) -> eyre::Result<()>;

    /// Drop every live token of `user_id`; returns how many were removed
    async fn revoke_user(&self, user_id: &str) -> eyre::Result<usize>;
}

fn whitelist_key(jti: &str) -> String {
    format!("jwt:whitelist:{}", jti)
}

/// Set of the jtis issued to one user
fn user_tokens_key(user_id: &str) -> String {
    format!("jwt:user:{}", user_id)
}

/// Redis-backed whitelist; entries expire with the token
#[derive(Clone)]
pub struct RedisTokenStore {
    client: ConnectionManager,
}

impl RedisTokenStore {
    pub fn new(manager: ConnectionManager) -> Self {
        tracing::info!("Redis token store initialized");
        Self { client: manager }
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn whitelist(&self, jti: &str, user_id: &str, ttl_secs: u64) -> eyre::Result<()> {
        let mut conn = self.client.clone();
        let index = user_tokens_key(user_id);
        // The index lives as long as the newest token; stale members are harmless.
        redis::pipe()
            .atomic()
            .set_ex(whitelist_key(jti), user_id, ttl_secs)
            .sadd(&index, jti)
            .expire(&index, ttl_secs as i64)
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| eyre::eyre!("Failed to whitelist token: {}", e))
    }

    async fn is_whitelisted(&self, jti: &str) -> eyre::Result<bool> {
        let mut conn = self.client.clone();
        conn.exists(whitelist_key(jti))
            .await
            .map_err(|e| eyre::eyre!("Failed to check whitelist: {}", e))
    }

    async fn revoke(&self, jti: &str) -> eyre::Result<()> {
        let mut conn = self.client.clone();
        conn.del::<_, ()>(whitelist_key(jti))
            .await
            .map_err(|e| eyre::eyre!("Failed to revoke token: {}", e))
    }

    async fn revoke_user(&self, user_id: &str) -> eyre::Result<usize> {
        let mut conn = self.client.clone();
        let index = user_tokens_key(user_id);

        let jtis: Vec<String> = conn
            .smembers(&index)
            .await
            .map_err(|e| eyre::eyre!("Failed to list user tokens: {}", e))?;

        if jtis.is_empty() {
            return Ok(0);
        }

        let keys: Vec<String> = jtis.iter().map(|jti| whitelist_key(jti)).collect();
        let (removed, _): (usize, usize) = redis::pipe()
            .atomic()
            .del(keys)
            .del(&index)
            .query_async(&mut conn)
            .await
            .map_err(|e| eyre::eyre!("Failed to revoke user tokens: {}", e))?;

        Ok(removed)
    }
}

/// Process-local whitelist for tests and single-instance deployments
#[derive(Clone, Default)]
pub struct InMemoryTokenStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

struct Entry {
    user_id: String,
    expires_at: Instant,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn whitelist(&self, jti: &str, user_id: &str, ttl_secs: u64) -> eyre::Result<()> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        // Drop expired ids.
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            jti.to_string(),
            Entry {
                user_id: user_id.to_string(),
                expires_at: now + Duration::from_secs(ttl_secs),
            },
        );
        Ok(())
    }

    async fn is_whitelisted(&self, jti: &str) -> eyre::Result<bool> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(jti)
            .is_some_and(|entry| entry.expires_at > Instant::now()))
    }

    async fn revoke(&self, jti: &str) -> eyre::Result<()> {
        self.entries.write().await.remove(jti);
        Ok(())
    }

    async fn revoke_user(&self, user_id: &str) -> eyre::Result<usize> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.user_id != user_id);
        Ok(before - entries.len())
    }
}
