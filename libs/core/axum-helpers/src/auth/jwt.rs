use super::config::JwtConfig;
use super::store::TokenStore;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Claims carried by every bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,  // User ID
    pub email: String,
    pub name: String,
    pub role: String, // "ADMIN" | "USER"
    pub exp: i64,
    pub iat: i64,
    pub jti: String,  // Whitelist key
}

/// Who a token is issued for
#[derive(Debug, Clone)]
pub struct TokenSubject<'a> {
    pub user_id: &'a str,
    pub email: &'a str,
    pub name: &'a str,
    pub role: &'a str,
}

/// Signed JWTs whose ids must also be present in a [`TokenStore`].
///
/// The signature proves who issued the token; the whitelist makes logout effective
/// before `exp`.
#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
    ttl_secs: u64,
    store: Arc<dyn TokenStore>,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig, store: Arc<dyn TokenStore>) -> Self {
        tracing::info!(ttl_secs = config.ttl_secs, "JWT auth initialized");
        Self {
            secret: config.secret.clone(),
            ttl_secs: config.ttl_secs,
            store,
        }
    }

    /// Sign a token for `subject` and whitelist its id
    pub async fn issue(&self, subject: &TokenSubject<'_>) -> eyre::Result<String> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: subject.user_id.to_string(),
            email: subject.email.to_string(),
            name: subject.name.to_string(),
            role: subject.role.to_string(),
            exp: (now + Duration::seconds(self.ttl_secs as i64)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        self.store
            .whitelist(&claims.jti, &claims.sub, self.ttl_secs)
            .await?;

        tracing::debug!(user_id = %claims.sub, jti = %claims.jti, "Issued token");
        Ok(token)
    }

    /// Check signature and expiry only
    pub fn verify_token(&self, token: &str) -> eyre::Result<JwtClaims> {
        let data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(data.claims)
    }

    pub async fn is_token_whitelisted(&self, jti: &str) -> eyre::Result<bool> {
        self.store.is_whitelisted(jti).await
    }

    /// Remove the token from the whitelist (logout)
    pub async fn revoke_token(&self, jti: &str) -> eyre::Result<()> {
        self.store.revoke(jti).await
    }

    /// Remove every token issued to `user_id`, e.g. after deletion or a role change
    pub async fn revoke_user_tokens(&self, user_id: &str) -> eyre::Result<usize> {
        let revoked = self.store.revoke_user(user_id).await?;
        tracing::info!(user_id, revoked, "Revoked user tokens");
        Ok(revoked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::InMemoryTokenStore;

    fn auth() -> JwtAuth {
        let config = JwtConfig::new("test-secret-that-is-long-enough-1234567890").unwrap();
        JwtAuth::new(&config, Arc::new(InMemoryTokenStore::new()))
    }

    fn subject() -> TokenSubject<'static> {
        TokenSubject {
            user_id: "0193a1b2-0000-7000-8000-000000000001",
            email: "superadmin@vascomm.co.id",
            name: "Super Admin",
            role: "ADMIN",
        }
    }

    #[tokio::test]
    async fn test_issue_then_verify() {
        let auth = auth();
        let token = auth.issue(&subject()).await.unwrap();

        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.name, "Super Admin");
        assert_eq!(claims.role, "ADMIN");
        assert!(claims.exp > claims.iat);
        assert!(auth.is_token_whitelisted(&claims.jti).await.unwrap());
    }

    #[tokio::test]
    async fn test_revoked_token_still_verifies_but_is_not_whitelisted() {
        let auth = auth();
        let token = auth.issue(&subject()).await.unwrap();
        let claims = auth.verify_token(&token).unwrap();

        auth.revoke_token(&claims.jti).await.unwrap();

        assert!(auth.verify_token(&token).is_ok());
        assert!(!auth.is_token_whitelisted(&claims.jti).await.unwrap());
    }

    #[tokio::test]
    async fn test_revoke_user_tokens_drops_all_sessions() {
        let auth = auth();
        let first = auth.verify_token(&auth.issue(&subject()).await.unwrap()).unwrap();
        let second = auth.verify_token(&auth.issue(&subject()).await.unwrap()).unwrap();

        let revoked = auth.revoke_user_tokens(subject().user_id).await.unwrap();

        assert_eq!(revoked, 2);
        assert!(!auth.is_token_whitelisted(&first.jti).await.unwrap());
        assert!(!auth.is_token_whitelisted(&second.jti).await.unwrap());
    }

    #[tokio::test]
    async fn test_token_from_other_secret_is_rejected() {
        let token = auth().issue(&subject()).await.unwrap();

        let other = JwtConfig::new("another-secret-that-is-long-enough-0987654321").unwrap();
        let other = JwtAuth::new(&other, Arc::new(InMemoryTokenStore::new()));
        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(auth().verify_token("not.a.jwt").is_err());
    }
}
