use axum_helpers::{JwtAuth, title_case};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{ChangePassword, CreateUser, Role, UpdateUser, User, UserFilter};
use crate::password::hash_password;
use crate::repository::UserRepository;

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    sessions: Option<JwtAuth>,
}

fn parse_role(role: &str) -> UserResult<Role> {
    role.parse()
        .map_err(|_| UserError::Validation("role: must be one of ADMIN, USER".to_string()))
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            sessions: None,
        }
    }

    /// Revoke a user's bearer tokens when they are deleted or their role changes
    pub fn with_sessions(mut self, jwt: JwtAuth) -> Self {
        self.sessions = Some(jwt);
        self
    }

    async fn end_sessions(&self, id: Uuid) -> UserResult<()> {
        if let Some(jwt) = &self.sessions {
            jwt.revoke_user_tokens(&id.to_string())
                .await
                .map_err(|e| UserError::Token(e.to_string()))?;
        }
        Ok(())
    }

    /// List active users
    #[instrument(skip(self))]
    pub async fn list_users(&self, filter: UserFilter) -> UserResult<Vec<User>> {
        self.repository.list(filter).await
    }

    /// Get an active user by ID
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// Create a new user with password hashing.
    ///
    /// The email must be unused by every user, soft-deleted ones included.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        input.validate()?;
        let role = parse_role(&input.role)?;

        if self.repository.email_exists(&input.email).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let password_hash = hash_password(&input.password)?;
        let user = User::new(title_case(input.name.trim()), input.email, password_hash, role);

        self.repository
            .create(user)
            .await
            .map_err(|e| UserError::persistence("Failed add users.", e))
    }

    /// Update name, email and role; the password is left untouched.
    ///
    /// `input` is converted after the lookup so a missing user wins over a malformed body.
    #[instrument(skip(self, input))]
    pub async fn update_user<I>(&self, id: Uuid, input: I) -> UserResult<User>
    where
        I: TryInto<UpdateUser>,
        UserError: From<I::Error>,
    {
        let mut user = self.get_user(id).await?;

        let input: UpdateUser = input.try_into()?;
        input.validate()?;
        let role = parse_role(&input.role)?;

        if self.repository.email_taken_by_other(&input.email, id).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let role_changed = user.role != role;
        user.name = title_case(input.name.trim());
        user.email = input.email;
        user.role = role;

        let user = self
            .repository
            .update(user)
            .await
            .map_err(|e| UserError::persistence("Failed update users.", e))?;

        if role_changed {
            self.end_sessions(id).await?;
        }
        Ok(user)
    }

    /// Soft-delete a user and return the record as it was removed
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: Uuid) -> UserResult<User> {
        self.get_user(id).await?;

        let user = self
            .repository
            .soft_delete(id)
            .await
            .map_err(|e| UserError::persistence("Failed delete.", e))?
            .ok_or(UserError::NotFound(id))?;

        self.end_sessions(id).await?;
        Ok(user)
    }

    /// Replace a user's password
    #[instrument(skip(self, input))]
    pub async fn change_password<I>(&self, id: Uuid, input: I) -> UserResult<User>
    where
        I: TryInto<ChangePassword>,
        UserError: From<I::Error>,
    {
        let mut user = self.get_user(id).await?;

        let input: ChangePassword = input.try_into()?;
        input.validate()?;
        user.password_hash = hash_password(&input.password)?;

        self.repository
            .update(user)
            .await
            .map_err(|e| UserError::persistence("Failed update user password.", e))
    }
}
