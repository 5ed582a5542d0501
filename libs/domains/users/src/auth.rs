//! Login and logout on top of [`JwtAuth`].

use axum_helpers::{JwtAuth, JwtClaims, TokenSubject};
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{LoginRequest, TokenResponse};
use crate::password::verify_password;
use crate::repository::UserRepository;

#[derive(Clone)]
pub struct AuthService<R: UserRepository> {
    repository: Arc<R>,
    jwt: JwtAuth,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(repository: R, jwt: JwtAuth) -> Self {
        Self {
            repository: Arc::new(repository),
            jwt,
        }
    }

    /// Check credentials and issue a whitelisted bearer token
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginRequest) -> UserResult<TokenResponse> {
        input.validate()?;

        let user = self
            .repository
            .get_by_email(&input.email)
            .await?
            .ok_or_else(|| UserError::UnknownEmail(input.email.clone()))?;

        if !verify_password(&input.password, &user.password_hash)? {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(UserError::WrongPassword);
        }

        let user_id = user.id.to_string();
        let token = self
            .jwt
            .issue(&TokenSubject {
                user_id: &user_id,
                email: &user.email,
                name: &user.name,
                role: user.role.as_str(),
            })
            .await
            .map_err(|e| UserError::Token(e.to_string()))?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(TokenResponse::bearer(token))
    }

    /// Revoke the token the request was authenticated with
    #[instrument(skip(self, claims), fields(user_id = %claims.sub))]
    pub async fn logout(&self, claims: &JwtClaims) -> UserResult<()> {
        self.jwt
            .revoke_token(&claims.jti)
            .await
            .map_err(|e| UserError::Token(e.to_string()))?;

        tracing::info!("User logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, User};
    use crate::password::hash_password;
    use crate::repository::InMemoryUserRepository;
    use axum_helpers::{InMemoryTokenStore, JwtConfig};

    async fn setup() -> (AuthService<InMemoryUserRepository>, JwtAuth) {
        let repo = InMemoryUserRepository::new();
        repo.create(User::new(
            "Super Admin".into(),
            "superadmin@vascomm.co.id".into(),
            hash_password("vascomm123").unwrap(),
            Role::Admin,
        ))
        .await
        .unwrap();

        let config = JwtConfig::new("auth-service-test-secret-0123456789abcdef").unwrap();
        let jwt = JwtAuth::new(&config, Arc::new(InMemoryTokenStore::new()));
        (AuthService::new(repo, jwt.clone()), jwt)
    }

    fn credentials(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_login_issues_bearer_token() {
        let (auth, jwt) = setup().await;
        let token = auth
            .login(credentials("superadmin@vascomm.co.id", "vascomm123"))
            .await
            .unwrap();

        assert_eq!(token.token_type, "Bearer");
        let claims = jwt.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.name, "Super Admin");
        assert_eq!(claims.role, "ADMIN");
        assert!(jwt.is_token_whitelisted(&claims.jti).await.unwrap());
    }

    #[tokio::test]
    async fn test_login_failures() {
        let (auth, _) = setup().await;

        let err = auth
            .login(credentials("nobody@vascomm.co.id", "vascomm123"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::UnknownEmail(_)));

        let err = auth
            .login(credentials("superadmin@vascomm.co.id", "nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::WrongPassword));
    }

    #[tokio::test]
    async fn test_logout_revokes_token() {
        let (auth, jwt) = setup().await;
        let token = auth
            .login(credentials("superadmin@vascomm.co.id", "vascomm123"))
            .await
            .unwrap();
        let claims = jwt.verify_token(&token.access_token).unwrap();

        auth.logout(&claims).await.unwrap();
        assert!(!jwt.is_token_whitelisted(&claims.jti).await.unwrap());
    }
}
